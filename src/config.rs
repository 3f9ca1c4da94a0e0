use config::builder::DefaultState;
use config::ConfigBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

/// Loads settings from defaults, an optional `trivia.toml` and `TRIVIA__*` environment variables,
/// in that order of precedence.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenv::dotenv().ok();
    defaults()?
        .add_source(config::File::with_name("trivia").required(false))
        .add_source(
            config::Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)
}
