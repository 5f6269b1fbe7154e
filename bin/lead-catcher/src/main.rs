//! # lead-catcher Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;

use lc_api::AppState;
use lc_config::{init_tracing, AppConfig};
use lc_core::LeadStore;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

// Feature-gated imports: the store plugin is chosen at compile time
#[cfg(feature = "store-supabase")]
use lc_store_supabase::SupabaseLeadStore;

#[cfg(not(feature = "store-supabase"))]
use lc_core::InMemoryLeadStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config)?;

    // 1. Initialize the store implementation
    let store = build_store(&config)?;

    // 2. Wrap in AppState (dynamic dispatch keeps the handler plugin-agnostic)
    let state = AppState::new(config.form.clone(), config.leads_table.clone(), store)
        .with_max_body_bytes(config.max_body_bytes);
    let app = lc_api::router(state);

    let addr = config.socket_addr()?;
    info!(%addr, table = %config.leads_table, "lead-catcher starting");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            error!(error = %err, "server exited");
            err
        })?;

    Ok(())
}

#[cfg(feature = "store-supabase")]
fn build_store(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn LeadStore>>> {
    match config.store_credentials() {
        Some(creds) => {
            let store = SupabaseLeadStore::new(creds.url, creds.service_key)?;
            info!(url = creds.url, "supabase store configured");
            Ok(Some(Arc::new(store)))
        }
        None => {
            // Submissions will fail with a configuration error until this is fixed.
            warn!("SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY missing; no store configured");
            Ok(None)
        }
    }
}

#[cfg(not(feature = "store-supabase"))]
fn build_store(_config: &AppConfig) -> anyhow::Result<Option<Arc<dyn LeadStore>>> {
    warn!("built without store-supabase; leads are kept in memory only");
    Ok(Some(Arc::new(InMemoryLeadStore::new())))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => error!(error = %err, "failed to listen for shutdown signal"),
    }
}
