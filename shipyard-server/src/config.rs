//! Server settings read from the environment.

use std::str::FromStr;

use shipyard_core::PageMode;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Backing store for ship records.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StoreMode {
    /// PostgreSQL through Diesel.
    #[default]
    Postgres,
    /// Process memory; contents are lost on restart.
    Memory,
}

impl FromStr for StoreMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreMode::Postgres),
            "memory" | "mem" => Ok(StoreMode::Memory),
            other => Err(format!("unknown store mode: {other}")),
        }
    }
}

/// Settings for the HTTP server process.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Selected ship store.
    pub store_mode: StoreMode,
    /// PostgreSQL connection string, required for [`StoreMode::Postgres`].
    pub database_url: Option<String>,
    /// Whether pages are cut before or after sorting.
    pub page_mode: PageMode,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load settings from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let host = lookup("SHIPYARD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("SHIPYARD_PORT must be a u16 number, got {raw}"))?,
            None => DEFAULT_PORT,
        };
        let store_mode = lookup("SHIPYARD_STORE_MODE")
            .map(|raw| raw.parse::<StoreMode>())
            .transpose()?
            .unwrap_or_default();
        let database_url = lookup("DATABASE_URL").filter(|value| !value.trim().is_empty());
        if store_mode == StoreMode::Postgres && database_url.is_none() {
            return Err(
                "DATABASE_URL must be set to a PostgreSQL connection string".to_string(),
            );
        }
        let page_mode = lookup("SHIPYARD_PAGE_MODE")
            .map(|raw| raw.parse::<PageMode>().map_err(|err| err.message().to_string()))
            .transpose()?
            .unwrap_or_default();
        let origins = lookup("SHIPYARD_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            store_mode,
            database_url,
            page_mode,
            allowed_origins,
        })
    }
}
