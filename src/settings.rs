use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Process configuration, built once at start-up and handed to the pool and the server.
///
/// Sources, lowest precedence first: defaults, an optional `trivia.toml` in the working
/// directory, then `TRIVIA_*` environment variables (`.env` is honoured).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("trivia.db"),
            host: "0.0.0.0".to_owned(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config::builder()
            .add_source(File::with_name("trivia").required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()
            .context("Failed to read configuration")?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        config
            .try_deserialize()
            .context("Invalid configuration values")
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let settings = Settings::from_config(Config::builder().build().unwrap()).unwrap();
        assert_eq!(settings.db_path, PathBuf::from("trivia.db"));
        assert_eq!(settings.port, 8080);
        assert!(settings.cors_origins.is_empty());
    }

    #[test]
    fn overrides_take_precedence() {
        let config = Config::builder()
            .set_override("port", 9000)
            .unwrap()
            .set_override("db_path", "/tmp/quiz.db")
            .unwrap()
            .set_override("cors_origins", vec!["http://localhost:3000"])
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings::from_config(config).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/quiz.db"));
        assert_eq!(settings.cors_origins, vec!["http://localhost:3000".to_owned()]);
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let settings = Settings {
            host: "not a host".to_owned(),
            ..Settings::default()
        };
        assert!(settings.bind_addr().is_err());
        assert_eq!(
            Settings::default().bind_addr().unwrap(),
            "0.0.0.0:8080".parse().unwrap()
        );
    }
}
