use hub_service::pagination::DEFAULT_MAX_PAGE_SIZE;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

fn default_bind_addr() -> String {
    std::env::var("HUB_API_BIND").unwrap_or_else(|_| "0.0.0.0:3131".to_string())
}

pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("HUB_API_DB_PATH") {
        return PathBuf::from(path);
    }

    if cfg!(windows) {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("hub").join("api").join("hub.db")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".hub").join("api").join("hub.db")
    }
}

fn default_max_page_size() -> i64 {
    std::env::var("HUB_API_MAX_PAGE_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &i64| *n > 0)
        .unwrap_or(DEFAULT_MAX_PAGE_SIZE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            db_path: default_db_path(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
