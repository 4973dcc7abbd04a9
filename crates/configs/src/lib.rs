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
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

/// Everything the storage layer needs to pick and open a backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON array file per collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Set on managed/serverless hosts where the local filesystem is not writable.
    #[serde(default)]
    pub managed_host: bool,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub kv: KvConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            managed_host: false,
            database: DatabaseConfig::default(),
            kv: KvConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Credentials for a REST key-value store (Upstash / Vercel KV protocol).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KvConfig {
    #[serde(default)]
    pub rest_api_url: String,
    #[serde(default)]
    pub rest_api_token: String,
}

fn default_data_dir() -> String { "data".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fall back to defaults when the
    /// file is absent, then layer environment variables on top.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env_with(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Environment wins over the file.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = non_empty(lookup("SERVER_HOST")) {
            self.server.host = host;
        }
        if let Some(port) = non_empty(lookup("SERVER_PORT")).and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = non_empty(lookup("TOKIO_WORKER_THREADS")).and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        self.storage.apply_env_with(&lookup);
    }

    pub fn validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
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
}

impl StorageConfig {
    pub fn apply_env_with<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = non_empty(lookup("DATA_DIR")) {
            self.data_dir = dir;
        }
        if non_empty(lookup("VERCEL")).is_some() || non_empty(lookup("STOREFRONT_MANAGED_HOST")).is_some() {
            self.managed_host = true;
        }
        self.database.normalize_from(lookup);
        if let Some(url) = non_empty(lookup("KV_REST_API_URL")) {
            self.kv.rest_api_url = url;
        }
        if let Some(token) = non_empty(lookup("KV_REST_API_TOKEN")) {
            self.kv.rest_api_token = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.database.is_configured() {
            self.database.validate()?;
        }
        if self.kv.is_configured() {
            self.kv.validate()?;
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    fn normalize_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // env wins; POSTGRES_URL is what managed Postgres add-ons inject
        if let Some(url) = non_empty(lookup("DATABASE_URL")).or_else(|| non_empty(lookup("POSTGRES_URL"))) {
            self.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("storage.database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("storage.database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("storage.database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("storage.database timeouts must be positive"));
        }
        Ok(())
    }
}

impl KvConfig {
    /// Both URL and token are required; one without the other is ignored.
    pub fn is_configured(&self) -> bool {
        !self.rest_api_url.trim().is_empty() && !self.rest_api_token.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.rest_api_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("storage.kv.rest_api_url must start with http(s)"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_point_at_local_data_dir() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.data_dir, "data");
        assert!(!cfg.storage.database.is_configured());
        assert!(!cfg.storage.kv.is_configured());
        assert!(!cfg.storage.managed_host);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            data_dir = "fixtures"
            "#,
        )
        .unwrap();
        cfg.apply_env_with(lookup(&[
            ("SERVER_PORT", "9100"),
            ("POSTGRES_URL", "postgres://u:p@localhost/shop"),
            ("VERCEL", "1"),
        ]));
        cfg.validate().unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.data_dir, "fixtures");
        assert_eq!(cfg.storage.database.url, "postgres://u:p@localhost/shop");
        assert!(cfg.storage.managed_host);
    }

    #[test]
    fn database_url_takes_precedence_over_postgres_url() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_with(lookup(&[
            ("DATABASE_URL", "postgres://primary/db"),
            ("POSTGRES_URL", "postgres://secondary/db"),
        ]));
        assert_eq!(cfg.storage.database.url, "postgres://primary/db");
    }

    #[test]
    fn kv_needs_both_url_and_token() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_with(lookup(&[("KV_REST_API_URL", "https://kv.example.com")]));
        assert!(!cfg.storage.kv.is_configured());

        cfg.apply_env_with(lookup(&[("KV_REST_API_TOKEN", "secret")]));
        assert!(cfg.storage.kv.is_configured());
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_database_scheme() {
        let mut cfg = AppConfig::default();
        cfg.storage.database.url = "mysql://localhost/shop".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_with(lookup(&[("DATA_DIR", "   "), ("VERCEL", "")]));
        assert_eq!(cfg.storage.data_dir, "data");
        assert!(!cfg.storage.managed_host);
    }
}
