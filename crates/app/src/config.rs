use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/monedero.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// IANA timezone used to resolve "today" for date filters.
    pub timezone: String,
    pub session_path: String,
    pub page_size: u32,
    pub log: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timezone: "America/Lima".to_string(),
            session_path: client::DEFAULT_SESSION_PATH.to_string(),
            page_size: 10,
            log: "info".to_string(),
        }
    }
}

/// Values the command line may override on top of file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub timezone: Option<String>,
}

pub fn load(overrides: &Overrides) -> Result<AppConfig, config::ConfigError> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MONEDERO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &overrides.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timezone) = &overrides.timezone {
        settings.timezone = timezone.clone();
    }

    Ok(settings)
}
