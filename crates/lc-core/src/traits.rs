//! # Core Traits (Ports)
//!
//! Any store plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Submission;

/// Persistence contract for accepted leads.
///
/// One call is one row. Implementations must not retry on their own; the
/// handler reports a failed insert to the visitor instead.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Inserts `record` into `table`.
    async fn insert(&self, table: &str, record: &Submission) -> Result<(), StoreError>;
}
