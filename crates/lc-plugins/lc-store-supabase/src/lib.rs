//! # lc-store-supabase
//!
//! `LeadStore` over the Supabase REST (PostgREST) API.
//! One insert is one `POST /rest/v1/<table>` authenticated with the service
//! role key. No retries and no client-side timeout; the hosting request
//! lifecycle bounds the call.

use async_trait::async_trait;
use lc_core::error::StoreError;
use lc_core::models::Submission;
use lc_core::traits::LeadStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

const REST_PATH: &str = "rest/v1";

pub struct SupabaseLeadStore {
    client: reqwest::Client,
    /// Project URL without trailing slash (e.g., "https://xyz.supabase.co")
    base_url: String,
    service_key: SecretString,
}

impl SupabaseLeadStore {
    pub fn new(base_url: &str, service_key: &SecretString) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lead-catcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StoreError::Unavailable(format!("http client init failed: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            service_key: SecretString::from(service_key.expose_secret().to_owned()),
        })
    }

    /// Table endpoint: "<base>/rest/v1/<table>"
    pub fn table_endpoint(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }
}

#[async_trait]
impl LeadStore for SupabaseLeadStore {
    async fn insert(&self, table: &str, record: &Submission) -> Result<(), StoreError> {
        let body = serde_json::to_vec(record).map_err(|err| StoreError::Encoding(err.to_string()))?;
        let key = self.service_key.expose_secret();

        let response = self
            .client
            .post(self.table_endpoint(table))
            .header("apikey", key)
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(table, status = status.as_u16(), "supabase insert accepted");
            return Ok(());
        }

        // PostgREST puts the reason (constraint, missing column, RLS) in the body.
        let detail = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
