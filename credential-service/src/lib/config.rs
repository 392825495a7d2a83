use std::env;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub private_key_path: String,
    pub public_key_path: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub users: Vec<BootstrapUserConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapUserConfig {
    pub id: Uuid,
    pub password: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::layered(&run_mode, environment())
    }

    fn layered(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// Unprefixed variables, `__` between path segments.
///
/// Example: DATABASE__BACKEND=sqlite overrides database.backend
fn environment() -> Environment {
    Environment::default().separator("__")
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    ConfigBuilder::builder()
        .set_default("server.address", "0.0.0.0")?
        .set_default("server.http_port", 1203_i64)?
        .set_default("database.backend", "memory")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("jwt.private_key_path", "keys/private_key.pem")?
        .set_default("jwt.public_key_path", "keys/public_key.pem")?
        .set_default("jwt.access_token_ttl_seconds", 300_i64)?
        .set_default("jwt.refresh_token_ttl_seconds", 600_i64)?
        .set_default("password.memory_kib", 19_456_i64)?
        .set_default("password.iterations", 2_i64)?
        .set_default("password.parallelism", 1_i64)
}
