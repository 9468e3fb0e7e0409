use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "RWORKFORCE_HOME";
pub const LLM_KEY_ENV: &str = "RWORKFORCE_LLM_API_KEY";
pub const SENDGRID_KEY_ENV: &str = "SENDGRID_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_organization")]
    pub organization: i64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub routes: RouteCostConfig,
    #[serde(default)]
    pub incidents: IncidentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub webhooks: WebhookConfig,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

/// Fallback constants used by the route cost estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCostConfig {
    #[serde(default = "default_fuel_consumption")]
    pub fuel_consumption_per_100km: f64,
    #[serde(default = "default_fuel_price")]
    pub fuel_price_per_liter: f64,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentConfig {
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,
    #[serde(default = "default_max_logs")]
    pub max_logs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    #[default]
    None,
    Sendgrid,
    Outbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default)]
    pub admin_address: String,
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebhookConfig {
    #[serde(default)]
    pub slack_url: Option<String>,
    #[serde(default)]
    pub discord_url: Option<String>,
}

/// Provider credentials, read from the environment once at startup.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub llm_api_key: Option<String>,
    pub sendgrid_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            llm_api_key: non_empty_env(LLM_KEY_ENV),
            sendgrid_api_key: non_empty_env(SENDGRID_KEY_ENV),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_organization() -> i64 {
    1
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_http_timeout() -> u64 {
    15
}
fn default_separator_char() -> String {
    "-".to_string()
}
fn default_fuel_consumption() -> f64 {
    8.5
}
fn default_fuel_price() -> f64 {
    1.5
}
fn default_hourly_rate() -> f64 {
    25.0
}
fn default_min_occurrences() -> usize {
    3
}
fn default_max_logs() -> usize {
    10
}
fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_from_address() -> String {
    "alerts@rworkforce.local".to_string()
}
fn default_outbox_dir() -> String {
    Config::config_dir()
        .join("outbox")
        .to_string_lossy()
        .to_string()
}

impl Default for RouteCostConfig {
    fn default() -> Self {
        Self {
            fuel_consumption_per_100km: default_fuel_consumption(),
            fuel_price_per_liter: default_fuel_price(),
            hourly_rate: default_hourly_rate(),
        }
    }
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            min_occurrences: default_min_occurrences(),
            max_logs: default_max_logs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::None,
            from_address: default_from_address(),
            admin_address: String::new(),
            outbox_dir: default_outbox_dir(),
        }
    }
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            organization: default_organization(),
            currency_symbol: default_currency_symbol(),
            routes: RouteCostConfig::default(),
            incidents: IncidentConfig::default(),
            llm: LlmConfig::default(),
            email: EmailConfig::default(),
            webhooks: WebhookConfig::default(),
            http_timeout_secs: default_http_timeout(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Some(home) = non_empty_env(HOME_ENV) {
            return PathBuf::from(home);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rworkforce")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rworkforce")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rworkforce.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rworkforce.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
