use ::config::Map;
use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

pub const SERVICE_NAME: &str = "record-service";

#[derive(Debug, Clone)]
pub struct RecordConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
    pub app_name: String,
}

/// Raw MongoDB settings as they appear in the environment.
#[derive(Deserialize)]
struct MongoSettings {
    mongodb_uri: Option<String>,
    #[serde(default = "default_database")]
    mongodb_database: String,
    #[serde(default = "default_app_name")]
    mongodb_app_name: String,
}

fn default_database() -> String {
    "employees".to_string()
}

fn default_app_name() -> String {
    SERVICE_NAME.to_string()
}

impl RecordConfig {
    /// Loads `.env`, then the process environment. `MONGODB_URI` is required.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_source(None)
    }

    pub fn from_source(vars: Option<Map<String, String>>) -> Result<Self, AppError> {
        let common = core_config::Config::from_source(vars.clone())?;

        let settings: MongoSettings = core_config::builder(vars).build()?.try_deserialize()?;
        let uri = settings.mongodb_uri.ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "MONGODB_URI environment variable not set"
            ))
        })?;

        Ok(RecordConfig {
            common,
            mongodb: MongoConfig {
                uri: Secret::new(uri),
                database: settings.mongodb_database,
                app_name: settings.mongodb_app_name,
            },
        })
    }
}
