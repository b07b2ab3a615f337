use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Api {
    pub url: String,
    pub port: u16,
}

impl Api {
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.url, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("LEADBOT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_joins_host_and_port() {
        let api = Api {
            url: "http://127.0.0.1".to_string(),
            port: 8000,
        };
        assert_eq!(api.base_url(), "http://127.0.0.1:8000");
    }
}
