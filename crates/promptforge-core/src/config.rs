//! Configuration module
//!
//! Environment-based configuration for the API binary and services. Gateway
//! credentials are read here once and injected into the gateway client at
//! construction; nothing reads them ambiently after startup.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_GATEWAY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_GATEWAY_MODEL: &str = "gpt-4o";
const DEFAULT_GATEWAY_TEMPERATURE: f32 = 0.3;
const DEFAULT_STORAGE_PATH: &str = "./data/prompt-files";
const DEFAULT_STORAGE_BASE_URL: &str = "http://localhost:3000/files";

/// Settings for the external completion gateway.
///
/// `api_key` stays optional here: a missing key is surfaced as a gateway
/// configuration error at request time, not a startup crash, so the rest of
/// the service (history, delete) keeps working without credentials.
#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl GatewaySettings {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("GATEWAY_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            endpoint: env::var("GATEWAY_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_ENDPOINT.to_string()),
            model: env::var("GATEWAY_MODEL").unwrap_or_else(|_| DEFAULT_GATEWAY_MODEL.to_string()),
            temperature: env::var("GATEWAY_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GATEWAY_TEMPERATURE),
        }
    }
}

/// Top-level service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub storage_path: String,
    pub storage_base_url: String,
    pub gateway: GatewaySettings,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            cors_origins,
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string()),
            storage_base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string()),
            gateway: GatewaySettings::from_env(),
        })
    }
}
