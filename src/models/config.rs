use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which adapter backs the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Diesel + SQLite.
    Relational,
    /// JSON document collections with camelCase fields.
    Document,
}

/// Configuration options of the portfolio server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub database_url: String,
    pub document_store_path: String,
    /// Local category file used while the primary store is unavailable.
    pub category_fallback_path: Option<String>,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    pub templates_dir: String,
    /// Session signing key, at least 32 bytes.
    pub secret: String,
    pub session_ttl_minutes: u64,
    /// Argon2 PHC string of the admin password.
    pub admin_password_hash: String,
    pub store_timeout_secs: u64,
    pub alert_dismiss_seconds: u64,
}

impl ServerConfig {
    /// Layers `config/default.yaml`, `config/{APP_ENV}.yaml` and `APP__*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("backend", "relational")?
            .set_default("database_url", "app.db")?
            .set_default("document_store_path", "data/documents")?
            .set_default("upload_dir", "uploads")?
            .set_default("upload_url_prefix", "/uploads")?
            .set_default("templates_dir", "templates/**/*")?
            .set_default("session_ttl_minutes", 720)?
            .set_default("store_timeout_secs", 5)?
            .set_default("alert_dismiss_seconds", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.store_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "store_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.session_ttl_minutes == 0 {
            return Err(ConfigError::Message(
                "session_ttl_minutes must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServerConfig {
        ServerConfig {
            address: "127.0.0.1".to_string(),
            port: 8080,
            backend: StoreBackend::Relational,
            database_url: "app.db".to_string(),
            document_store_path: "data/documents".to_string(),
            category_fallback_path: None,
            upload_dir: "uploads".to_string(),
            upload_url_prefix: "/uploads".to_string(),
            templates_dir: "templates/**/*".to_string(),
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            session_ttl_minutes: 720,
            admin_password_hash: String::new(),
            store_timeout_secs: 5,
            alert_dismiss_seconds: 3,
        }
    }

    #[test]
    fn zero_store_timeout_is_rejected() {
        let config = ServerConfig {
            store_timeout_secs: 0,
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn positive_timeouts_pass() {
        let config = sample().validate().unwrap();
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert_eq!(config.session_ttl(), Duration::from_secs(720 * 60));
    }
}
