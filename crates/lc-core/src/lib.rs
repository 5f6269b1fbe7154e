//! lead-catcher/crates/lc-core/src/lib.rs
//!
//! The domain logic and port definitions for lead-catcher: decoding a posted
//! form, screening it, and describing the row handed to a `LeadStore`.

pub mod error;
pub mod form;
pub mod memory;
pub mod models;
pub mod policy;
pub mod traits;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use form::*;
pub use memory::InMemoryLeadStore;
pub use models::*;
pub use policy::*;
pub use traits::*;
pub use validation::*;

/// The only origin allowed to receive the outcome `postMessage` and the
/// value sent in `Access-Control-Allow-Origin`.
pub const TARGET_ORIGIN: &str = "https://annafrota.github.io";

/// Table written to when `LEADS_TABLE` is not configured.
pub const DEFAULT_TABLE: &str = "leads";
