//! # In-memory store
//!
//! `LeadStore` backed by a vector, for local runs without Supabase and for
//! tests that need to inspect what was written.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::Submission;
use crate::traits::LeadStore;

#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    rows: Mutex<Vec<(String, Submission)>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every `(table, row)` inserted so far, in insert order.
    pub async fn rows(&self) -> Vec<(String, Submission)> {
        self.rows.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert(&self, table: &str, record: &Submission) -> Result<(), StoreError> {
        self.rows.lock().await.push((table.to_string(), record.clone()));
        Ok(())
    }
}
