use std::path::PathBuf;

#[derive(Debug, serde::Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub db_url: String,
    pub host: String,
    pub port: u16,
    pub logging_config: String,
    pub cache_size_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_url: "sqlite://./summit.sqlite3?mode=rwc".into(),
            host: "0.0.0.0".into(),
            port: 3000,
            logging_config: "info,sqlx::query=error,hyper=error,tower_http=debug,axum::rejection=trace".into(),
            cache_size_bytes: 1024 * 1024,
        }
    }
}

pub(crate) fn read_config_inner(path_override: Option<PathBuf>) -> Result<Config, anyhow::Error> {
    let config_path = match path_override {
        Some(path) => path,
        None => PathBuf::from(std::env::var("SUMMIT_SERVER_CONFIG")?),
    };
    let config = std::fs::read_to_string(config_path)?;
    let config = serde_yaml::from_str::<Config>(&config)?;
    Ok(config)
}

pub fn read_config(path_override: Option<PathBuf>) -> Config {
    match read_config_inner(path_override) {
        Ok(config) => config,
        Err(e) => {
            //Print to stderr, since logging is set up in the config
            eprintln!("Warning: Failed to read config: {}", e);
            Config::default()
        }
    }
}
