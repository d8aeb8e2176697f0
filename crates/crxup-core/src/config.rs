//! Configuration module
//!
//! Process configuration is read from the environment (optionally through a `.env` file)
//! into [`ServerConfig`]. The catalog and descriptor code never read the environment
//! themselves; they receive a [`CatalogSettings`] built from it.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;

use crate::error::AppError;
use crate::naming::{ArchiveNaming, DEFAULT_ARCHIVE_PREFIX, DEFAULT_ARCHIVE_SUFFIX};

// Common constants
const SERVER_PORT: u16 = 3000;
const BIND_ADDRESS: &str = "0.0.0.0";
const STORAGE_DIR: &str = "extensions/pp-ext";
const ROUTE_PREFIX: &str = "/pp-ext";
const EXTENSION_NAME: &str = "pp-extension";
const MAX_UPLOAD_SIZE_MB: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Which transport surface is mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentProfile {
    /// Full server: listings, descriptors, uploads and artifact hosting.
    Server,
    /// Read-only hosting of a pre-populated directory; uploads are not mounted.
    Static,
}

impl DeploymentProfile {
    pub fn uploads_enabled(&self) -> bool {
        matches!(self, DeploymentProfile::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentProfile::Server => "server",
            DeploymentProfile::Static => "static",
        }
    }
}

impl FromStr for DeploymentProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(DeploymentProfile::Server),
            "static" => Ok(DeploymentProfile::Static),
            other => Err(anyhow!(
                "Invalid DEPLOYMENT_PROFILE '{}'. Must be 'server' or 'static'",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!(
                "Invalid LOG_FORMAT '{}'. Must be 'pretty' or 'json'",
                other
            )),
        }
    }
}

/// Everything the catalog and descriptor builder need to turn a directory into URLs.
#[derive(Clone, Debug)]
pub struct CatalogSettings {
    pub storage_directory: PathBuf,
    pub public_base_url: String,
    pub route_prefix: String,
    pub naming: ArchiveNaming,
}

impl CatalogSettings {
    pub fn new(
        storage_directory: impl Into<PathBuf>,
        public_base_url: &str,
        route_prefix: &str,
        naming: ArchiveNaming,
    ) -> Self {
        Self {
            storage_directory: storage_directory.into(),
            public_base_url: public_base_url.trim().trim_end_matches('/').to_string(),
            route_prefix: normalize_route_prefix(route_prefix),
            naming,
        }
    }

    /// Public URL of an artifact: base URL, route prefix, then the filename verbatim.
    pub fn download_url(&self, filename: &str) -> String {
        format!("{}{}/{}", self.public_base_url, self.route_prefix, filename)
    }

    /// Public URL of a route under the prefix (`path` starts with `/`).
    pub fn route_url(&self, path: &str) -> String {
        format!("{}{}{}", self.public_base_url, self.route_prefix, path)
    }
}

/// Normalize a route prefix to `/segment[/segment]` (or empty for the root).
pub fn normalize_route_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Update server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub bind_address: String,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub route_prefix: String,
    pub extension_name: String,
    pub archive_prefix: String,
    pub archive_suffix: String,
    pub deployment_profile: DeploymentProfile,
    pub max_upload_size_bytes: usize,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match var("PORT").or_else(|| var("SERVER_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid PORT '{}': {}", raw, e))?,
            None => SERVER_PORT,
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim()
            .trim_end_matches('/')
            .to_string();

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let deployment_profile = match var("DEPLOYMENT_PROFILE") {
            Some(raw) => raw.parse()?,
            None => DeploymentProfile::Server,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Pretty,
        };

        let max_upload_size_mb =
            parse_or("MAX_UPLOAD_SIZE_MB", var("MAX_UPLOAD_SIZE_MB"), MAX_UPLOAD_SIZE_MB)?;
        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), REQUEST_TIMEOUT_SECS)?;
        let http_concurrency_limit = parse_or(
            "HTTP_CONCURRENCY_LIMIT",
            var("HTTP_CONCURRENCY_LIMIT"),
            HTTP_CONCURRENCY_LIMIT,
        )?;

        Ok(ServerConfig {
            server_port,
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| BIND_ADDRESS.to_string()),
            storage_dir: PathBuf::from(var("STORAGE_DIR").unwrap_or_else(|| STORAGE_DIR.to_string())),
            public_base_url,
            route_prefix: normalize_route_prefix(
                &var("ROUTE_PREFIX").unwrap_or_else(|| ROUTE_PREFIX.to_string()),
            ),
            extension_name: var("EXTENSION_NAME").unwrap_or_else(|| EXTENSION_NAME.to_string()),
            archive_prefix: var("ARCHIVE_PREFIX")
                .unwrap_or_else(|| DEFAULT_ARCHIVE_PREFIX.to_string()),
            archive_suffix: var("ARCHIVE_SUFFIX")
                .unwrap_or_else(|| DEFAULT_ARCHIVE_SUFFIX.to_string()),
            deployment_profile,
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            cors_origins,
            request_timeout_secs,
            http_concurrency_limit: http_concurrency_limit.max(1),
            environment,
            log_format,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn uploads_enabled(&self) -> bool {
        self.deployment_profile.uploads_enabled()
    }

    pub fn naming(&self) -> Result<ArchiveNaming, AppError> {
        ArchiveNaming::new(self.archive_prefix.clone(), self.archive_suffix.clone())
    }

    pub fn catalog_settings(&self) -> Result<CatalogSettings, AppError> {
        Ok(CatalogSettings::new(
            self.storage_dir.clone(),
            &self.public_base_url,
            &self.route_prefix,
            self.naming()?,
        ))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.naming().map_err(|e| anyhow!("{}", e))?;

        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://, got '{}'",
                self.public_base_url
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        if self.extension_name.trim().is_empty() {
            return Err(anyhow!("EXTENSION_NAME must not be empty"));
        }

        Ok(())
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
