use std::net::{IpAddr, SocketAddr};

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};
use lc_core::{FormPolicy, DEFAULT_TABLE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

const LIST_KEYS: [&str; 9] = [
    "form.consent_tokens",
    "form.download_markers",
    "form.aliases.name",
    "form.aliases.email",
    "form.aliases.phone",
    "form.aliases.quantity",
    "form.aliases.contribution",
    "form.aliases.consent",
    "form.aliases.form_type",
];

/// Settings read from `.env` and the process environment.
///
/// `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` are optional on purpose:
/// the server still starts without them and answers every submission with
/// a configuration error until they are set.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub listen_host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_service_role_key: Option<SecretString>,
    pub leads_table: String,
    pub max_body_bytes: usize,
    #[serde(default)]
    pub form: FormPolicy,
}

/// Store endpoint and credential, only handed out when both are present.
#[derive(Debug)]
pub struct StoreCredentials<'a> {
    pub url: &'a str,
    pub service_key: &'a SecretString,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(Self::environment())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Process environment with `__` for nesting; list keys take
    /// comma-separated values, e.g. `FORM__CONSENT_TOKENS=on,sim`.
    fn environment() -> Environment {
        LIST_KEYS.iter().fold(
            Environment::default()
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
            |environment, key| environment.with_list_parse_key(key),
        )
    }

    /// Builder pre-filled with every default; sources are layered on top.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("listen_host", "0.0.0.0")?
            .set_default("port", 8888)?
            .set_default("log_level", "info")?
            .set_default("leads_table", DEFAULT_TABLE)?
            .set_default("max_body_bytes", 64 * 1024)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .listen_host
            .parse()
            .map_err(|err| ConfigError::Message(format!("invalid listen_host {:?}: {err}", self.listen_host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// `None` unless both the URL and the key are set to something non-blank.
    pub fn store_credentials(&self) -> Option<StoreCredentials<'_>> {
        let url = self.supabase_url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let service_key = self
            .supabase_service_role_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())?;
        Some(StoreCredentials { url, service_key })
    }
}
