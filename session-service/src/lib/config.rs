use std::env;
use std::str::FromStr;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use auth::TokenConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub credential_store: CredentialStoreConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub access_secret: Option<String>,
    #[serde(default)]
    pub refresh_secret: Option<String>,
    pub algorithm: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub issuer: String,
    pub access_audience: String,
    pub refresh_audience: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialStoreConfig {
    pub lookup_timeout_ms: u64,
}

/// Admin account created or updated at startup.
#[derive(Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

impl JwtConfig {
    /// Resolve secrets and build the token configuration.
    ///
    /// A missing access secret is replaced by a random one, so tokens do not
    /// survive a restart. A missing refresh secret falls back to the access
    /// secret.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Unknown algorithm name or out-of-range lifetime
    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        let access_secret = match non_empty(&self.access_secret) {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "jwt.access_secret is not set; using a random secret, issued tokens will not survive a restart"
                );
                random_secret()
            }
        };

        let refresh_secret = match non_empty(&self.refresh_secret) {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "jwt.refresh_secret is not set; falling back to the access secret. Set a distinct refresh secret in production"
                );
                access_secret.clone()
            }
        };

        let algorithm = Algorithm::from_str(&self.algorithm)
            .map_err(|e| ConfigError::Message(format!("jwt.algorithm: {}", e)))?;

        let access_ttl = chrono::Duration::try_minutes(self.access_ttl_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.access_ttl_minutes out of range: {}",
                self.access_ttl_minutes
            ))
        })?;
        let refresh_ttl = chrono::Duration::try_days(self.refresh_ttl_days).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.refresh_ttl_days out of range: {}",
                self.refresh_ttl_days
            ))
        })?;

        Ok(TokenConfig::new(access_secret, refresh_secret)
            .with_algorithm(algorithm)
            .with_lifetimes(access_ttl, refresh_ttl)
            .with_issuer(self.issuer.clone())
            .with_audiences(self.access_audience.clone(), self.refresh_audience.clone()))
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &self.access_secret.as_ref().map(|_| "<redacted>"))
            .field("refresh_secret", &self.refresh_secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("issuer", &self.issuer)
            .field("access_audience", &self.access_audience)
            .field("refresh_audience", &self.refresh_audience)
            .finish()
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn random_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 64];
    OsRng.fill_bytes(&mut secret);
    secret
}
