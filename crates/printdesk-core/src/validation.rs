//! # Validation Module
//!
//! Checks applied to boundary requests before any OS command or record store
//! call is made.
//!
//! ## Usage
//! ```rust
//! use printdesk_core::validation::validate_shop_id;
//!
//! assert!(validate_shop_id("7b0c2a9e-shop").is_ok());
//! assert!(validate_shop_id("  ").is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SHOP_ID_LEN: usize = 128;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a shop identifier and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most 128 characters
/// - No whitespace or control characters (it ends up in a filter expression)
pub fn validate_shop_id(shop_id: &str) -> ValidationResult<String> {
    let shop_id = shop_id.trim();

    if shop_id.is_empty() {
        return Err(ValidationError::Required {
            field: "shopId".to_string(),
        });
    }

    if shop_id.len() > MAX_SHOP_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "shopId".to_string(),
            max: MAX_SHOP_ID_LEN,
        });
    }

    if shop_id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "shopId".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(shop_id.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monitoring poll interval in milliseconds.
pub fn validate_poll_interval(interval_ms: u64) -> ValidationResult<()> {
    if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&interval_ms) {
        return Err(ValidationError::OutOfRange {
            field: "poll_interval_ms".to_string(),
            min: MIN_POLL_INTERVAL_MS,
            max: MAX_POLL_INTERVAL_MS,
        });
    }

    Ok(())
}
