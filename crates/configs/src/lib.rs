use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

/// Where the flat-file collections live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_profiles_file")]
    pub profiles_file: String,
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profiles_file: default_profiles_file(),
            transactions_file: default_transactions_file(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_profiles_file() -> String { "kyc_profiles.json".into() }
fn default_transactions_file() -> String { "transactions.json".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file first; when it is missing or invalid, build from environment variables.
    pub fn load_or_env() -> Result<Self> {
        Self::load_and_validate().or_else(|_| Self::from_env())
    }

    /// `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`, `DATA_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(host) = var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT") {
            cfg.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow!("SERVER_PORT={port:?}: {e}"))?;
        }
        if let Some(threads) = var("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(
                threads
                    .trim()
                    .parse()
                    .map_err(|e| anyhow!("TOKIO_WORKER_THREADS={threads:?}: {e}"))?,
            );
        }
        if let Some(dir) = var("DATA_DIR") {
            cfg.storage.data_dir = dir;
        }
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, name) in [("storage.profiles_file", &self.profiles_file), ("storage.transactions_file", &self.transactions_file)] {
            if name.trim().is_empty() {
                return Err(anyhow!("{key} must not be empty"));
            }
            if !name.ends_with(".json") {
                return Err(anyhow!("{key} must be a .json file"));
            }
        }
        if self.profiles_file == self.transactions_file {
            return Err(anyhow!("profiles and transactions must use different files"));
        }
        Ok(())
    }

    pub fn profiles_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.profiles_file)
    }

    pub fn transactions_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.transactions_file)
    }
}
