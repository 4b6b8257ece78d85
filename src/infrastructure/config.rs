use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "config/datadog";
const ENV_PREFIX: &str = "DD";
const DEFAULT_SITE: &str = "datadoghq.eu";

/// Resolved connection settings for the Datadog API.
#[derive(Debug, Clone, PartialEq)]
pub struct DatadogSettings {
    pub api_key: String,
    pub app_key: String,
    pub site: String,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl DatadogSettings {
    /// `https://api.{site}` unless an explicit base URL was configured.
    pub fn api_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api.{}", self.site),
        }
    }
}

/// Values given on the command line; these win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    pub site: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Datadog API credentials required")]
    MissingCredentials,
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize, Default)]
struct RawSettings {
    api_key: Option<String>,
    app_key: Option<String>,
    site: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Layer `config/datadog.*` (optional), `DD_*` environment variables and the
/// command-line overrides, in increasing priority.
pub fn load_datadog_settings(overrides: &SettingsOverrides) -> Result<DatadogSettings, SettingsError> {
    let builder = config::Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX));

    resolve(builder, overrides)
}

fn resolve(
    builder: ConfigBuilder<DefaultState>,
    overrides: &SettingsOverrides,
) -> Result<DatadogSettings, SettingsError> {
    let settings = builder
        .set_override_option("api_key", overrides.api_key.clone())?
        .set_override_option("app_key", overrides.app_key.clone())?
        .set_override_option("site", overrides.site.clone())?
        .build()?;

    let raw: RawSettings = settings.try_deserialize()?;

    let (Some(api_key), Some(app_key)) = (non_empty(raw.api_key), non_empty(raw.app_key)) else {
        return Err(SettingsError::MissingCredentials);
    };

    Ok(DatadogSettings {
        api_key,
        app_key,
        site: non_empty(raw.site).unwrap_or_else(|| DEFAULT_SITE.to_string()),
        base_url: non_empty(raw.base_url),
        timeout_secs: raw.timeout_secs,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
