use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. Without one the service runs on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Import the sample users when the server starts.
    pub on_startup: bool,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    ///
    /// A `.env` file in the working directory is read into the environment first.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from("config", &run_mode)
    }

    fn load_from(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 5000)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 720)?
            .set_default("seed.on_startup", false)?
            // Start with default configuration
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::Message(
                "jwt.secret must be at least 32 bytes".to_string(),
            ));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, expiration_hours: i64) -> Config {
        Config {
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
            },
            server: ServerConfig { http_port: 5000 },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_hours,
            },
            seed: SeedConfig { on_startup: false },
        }
    }

    fn config_dir() -> String {
        format!("{}/config", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_production_requires_secret_from_environment() {
        if env::var("JWT__SECRET").is_ok() {
            return;
        }

        let result = Config::load_from(&config_dir(), "production");
        assert!(result.is_err());
    }

    #[test]
    fn test_development_ships_a_secret() {
        let config = Config::load_from(&config_dir(), "development").unwrap();

        assert!(config.jwt.secret.len() >= 32);
        assert_eq!(config.jwt.expiration_hours, 720);
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(config("a-secret-that-is-at-least-32-bytes-long", 720)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        assert!(config("short", 720).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_lifetime() {
        assert!(config("a-secret-that-is-at-least-32-bytes-long", 0)
            .validate()
            .is_err());
    }
}
