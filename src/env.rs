use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

const DEFAULT_DATABASE_URL: &str = "sqlite://school_admin.db?mode=rwc";
const DEFAULT_OTLP_ENDPOINT: &str = "https://api.honeycomb.io:443";
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Env files found and applied, and those that were not there.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadedEnv {
    pub loaded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Runs before tracing is installed, so it reports what it did instead of
/// logging.
pub fn load_environment() -> Result<LoadedEnv, Box<dyn std::error::Error + Send + Sync>> {
    let is_production =
        dotenvy::var("ROCKET_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    let mut report = LoadedEnv::default();
    for env_file in env_files {
        if !Path::new(env_file).exists() {
            report.skipped.push(env_file);
            continue;
        }

        dotenvy::from_filename_override(env_file)?;
        report.loaded.push(env_file);
    }

    Ok(report)
}

impl LoadedEnv {
    pub fn log(&self) {
        for path in &self.loaded {
            info!("Loaded environment from: {}", path);
        }
        for path in &self.skipped {
            warn!("Environment file {} not found, skipping", path);
        }
    }
}

/// Process settings read from the environment after the env files are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub environment: String,
    pub honeycomb_api_key: Option<String>,
    pub otlp_endpoint: String,
    /// Base URL the teacher client talks to, including the `/api` prefix.
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let max_connections = match optional_var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => 5,
        };

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database_url: optional_var("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections,
            environment: optional_var("ROCKET_PROFILE")
                .unwrap_or_else(|| "development".to_string()),
            honeycomb_api_key: optional_var("HONEYCOMB_API_KEY"),
            otlp_endpoint: optional_var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OTLP_ENDPOINT.to_string()),
            api_base_url: optional_var("SCHOOL_ADMIN_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
