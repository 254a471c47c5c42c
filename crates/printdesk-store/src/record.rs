//! # Record Store Interface
//!
//! The generic collaborator the rest of the workspace talks to. Rows are plain
//! JSON objects; typing happens one level up in [`crate::repository`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

/// A remote table store scoped by an attached user session.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Attaches a user access token to subsequent queries.
    ///
    /// Fails with a credential error when the token is missing, expired or
    /// rejected; the previously attached session is kept in that case.
    async fn attach_session(&self, access_token: &str) -> StoreResult<()>;

    /// Returns every row of `table` matching `filter`.
    async fn query(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// Overwrites `fields` on the row whose `id` equals `id`.
    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<()>;
}

// =============================================================================
// Filter
// =============================================================================

/// Equality filter with an optional ascending sort column.
///
/// ## Example
/// ```rust
/// use printdesk_store::Filter;
///
/// let filter = Filter::new().eq("shop_id", "shop-1").order_by("created_at");
/// assert_eq!(filter.conditions().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
    order_by: Option<String>,
}

impl Filter {
    /// Creates a filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `column = value` condition.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Sorts results ascending by `column`.
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    /// Equality conditions, in insertion order.
    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    /// Sort column, if any.
    pub fn order_column(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// Evaluates the conditions against a JSON row.
    ///
    /// Strings compare directly; numbers and booleans compare by their JSON
    /// text so `eq("id", "7")` matches `{"id": 7}`.
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Number(n)) => n.to_string() == *expected,
                Some(Value::Bool(b)) => b.to_string() == *expected,
                _ => false,
            }
        })
    }
}
