use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub chat: Chat,
    #[serde(default)]
    pub client: Client,
    pub http: Http,
    pub log: Log,
}

#[derive(Deserialize)]
pub struct Chat {
    pub backend: String, // "fake" or "real"
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for Chat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chat")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key)
            .field("api_secret", &if self.api_secret.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Client {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Client {
    fn default() -> Self {
        Client {
            gateway_url: default_gateway_url(),
            storage_path: default_storage_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    #[serde(default)]
    pub cert_path: Option<String>,
    #[serde(default)]
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_chat_base_url() -> String {
    crate::infra_stream::DEFAULT_BASE_URL.to_string()
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_storage_path() -> String {
    ".huddle/session.json".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Environment overrides look like `HUDDLE__CHAT__API_SECRET`.
const ENV_PREFIX: &str = "HUDDLE";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
