//! # lc-config
//!
//! Process-wide configuration, loaded once at startup and never mutated.

pub mod logging;
pub mod settings;

pub use logging::init_tracing;
pub use settings::{AppConfig, StoreCredentials};
