use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3434";
pub const DEFAULT_MODEL_PATH: &str = "model/xgb_model.json";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost",
    "http://localhost:8080",
    "http://localhost:3000",
];

/// Optional TOML file read at startup. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: Option<String>,
    pub model_path: Option<String>,
    pub cors: Option<CorsConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// Directory for the daily-rolling JSON log. Unset means no file log.
    pub dir: Option<String>,
    #[serde(default)]
    pub json: bool,
}

pub fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|origin| origin.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let raw = r#"
listen_addr = "127.0.0.1:9000"
model_path = "/srv/models/xgb_model.json"

[cors]
allowed_origins = ["https://risk.example.com"]

[log]
dir = "/var/log/credit-risk"
json = true
"#;
        let config: ServerConfig = toml::from_str(raw).expect("config");
        assert_eq!(config.listen_addr.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(
            config.model_path.as_deref(),
            Some("/srv/models/xgb_model.json")
        );
        let cors = config.cors.expect("cors");
        assert_eq!(
            cors.allowed_origins,
            Some(vec!["https://risk.example.com".to_string()])
        );
        let log = config.log.expect("log");
        assert_eq!(log.dir.as_deref(), Some("/var/log/credit-risk"));
        assert!(log.json);
    }

    #[test]
    fn empty_config_is_valid() {
        let config: ServerConfig = toml::from_str("").expect("config");
        assert!(config.listen_addr.is_none());
        assert!(config.cors.is_none());
    }

    #[test]
    fn default_origins_are_local_development_hosts() {
        assert_eq!(
            default_allowed_origins(),
            vec![
                "http://localhost".to_string(),
                "http://localhost:8080".to_string(),
                "http://localhost:3000".to_string(),
            ]
        );
    }
}
