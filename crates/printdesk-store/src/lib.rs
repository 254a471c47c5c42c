//! # printdesk-store: Record Store Access for PrintDesk
//!
//! This crate owns every call to the shop's remote record store: fetching the
//! printers a shop registered and writing back their reconciled status.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  printdesk-monitor (gateway)                                            │
//! │        │                                                                │
//! │        │ connector.connect(url, key)      ◄── cached per (url, key)     │
//! │        ▼                                                                │
//! │  ┌───────────────────────────┐                                          │
//! │  │  dyn RecordStore          │  attach_session(token)                   │
//! │  │                           │  query(table, filter)                    │
//! │  │                           │  update(table, id, fields)               │
//! │  └─────────────┬─────────────┘                                          │
//! │                │                                                        │
//! │        ┌───────┴────────┐                                               │
//! │        ▼                ▼                                               │
//! │   RestStore        MemoryStore                                          │
//! │   (PostgREST)      (tests, demos)                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`record`] - The `RecordStore` trait and query filters
//! - [`rest`] - PostgREST/Supabase-dialect HTTP client
//! - [`memory`] - In-memory store
//! - [`connector`] - Client construction and the per-process cache
//! - [`credentials`] - Access token inspection
//! - [`repository`] - Typed access to `shop_printers`
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use printdesk_store::{CachedConnector, PrinterRepository, StoreConnector};
//!
//! let connector = CachedConnector::rest(Duration::from_secs(30));
//! let store = connector.connect("https://xyz.supabase.co", "anon-key")?;
//! store.attach_session(&access_token).await?;
//!
//! let repo = PrinterRepository::new(store, "shop_printers");
//! let printers = repo.fetch_for_shop("shop-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod connector;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod record;
pub mod repository;
pub mod rest;

// =============================================================================
// Re-exports
// =============================================================================

pub use connector::{CachedConnector, StoreConnector};
pub use credentials::{inspect_token, TokenClaims, TokenKind};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::{Filter, RecordStore};
pub use repository::{PersistReport, PrinterRepository};
pub use rest::RestStore;
