use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub run_migrations: bool,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Layers defaults, an optional config file and `TRIVIA_*` environment
    /// variables (`TRIVIA_DATABASE__URL`, `TRIVIA_APPLICATION__PORT`, ...).
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut builder = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 5000)?
            .set_default("database.url", "sqlite:trivia.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.run_migrations", true)?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[application]\nport = \"8081\"\n\n[database]\nurl = \"sqlite::memory:\"\nmax_connections = 1"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.application.port, 8081);
        assert_eq!(settings.application.host, "0.0.0.0");
        assert_eq!(settings.database.url.expose_secret(), "sqlite::memory:");
        assert_eq!(settings.database.max_connections, 1);
        assert!(settings.database.run_migrations);
    }

    #[test]
    fn database_url_is_redacted_in_debug() {
        let settings = DatabaseSettings {
            url: String::from("sqlite:secret.db").into(),
            max_connections: 1,
            run_migrations: false,
        };
        assert!(!format!("{settings:?}").contains("secret.db"));
    }

    #[test]
    fn address_joins_host_and_port() {
        let app = ApplicationSettings {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        };
        assert_eq!(app.address(), "127.0.0.1:5000");
    }
}
