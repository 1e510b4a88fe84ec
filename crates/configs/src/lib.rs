use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), file_name: default_file_name(), key_prefix: default_key_prefix() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { offset_minutes: default_offset_minutes() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_trial_days")]
    pub trial_days: i64,
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            trial_days: default_trial_days(),
            min_password_len: default_min_password_len(),
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_file_name() -> String { "inkbook.json".into() }
fn default_key_prefix() -> String { "@inkbook".into() }
fn default_offset_minutes() -> i64 { 60 }
fn default_trial_days() -> i64 { 7 }
fn default_min_password_len() -> usize { 6 }
fn default_token_ttl_hours() -> i64 { 12 }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env();
        self.server.normalize()?;
        self.storage.validate()?;
        self.reminders.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Environment wins over the file. Blank values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = var("INKBOOK_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
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
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty"));
        }
        if self.file_name.trim().is_empty() {
            return Err(anyhow!("storage.file_name is empty"));
        }
        if self.key_prefix.trim().is_empty() || self.key_prefix.contains(':') {
            return Err(anyhow!("storage.key_prefix must be non-empty and must not contain ':'"));
        }
        Ok(())
    }
}

impl ReminderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.offset_minutes <= 0 {
            return Err(anyhow!("reminders.offset_minutes must be positive"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trial_days <= 0 {
            return Err(anyhow!("auth.trial_days must be positive"));
        }
        if self.min_password_len == 0 {
            return Err(anyhow!("auth.min_password_len must be >= 1"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() -> Result<()> {
        let cfg = load_from_str("")?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.key_prefix, "@inkbook");
        assert_eq!(cfg.reminders.offset_minutes, 60);
        assert_eq!(cfg.auth.trial_days, 7);
        assert_eq!(cfg.auth.min_password_len, 6);
        Ok(())
    }

    #[test]
    fn partial_sections_keep_field_defaults() -> Result<()> {
        let cfg = load_from_str(
            r#"
            [storage]
            data_dir = "/tmp/ink"

            [reminders]
            offset_minutes = 30
            "#,
        )?;
        assert_eq!(cfg.storage.data_dir, "/tmp/ink");
        assert_eq!(cfg.storage.file_name, "inkbook.json");
        assert_eq!(cfg.reminders.offset_minutes, 30);
        Ok(())
    }

    #[test]
    fn rejects_prefix_with_separator() {
        let storage = StorageConfig { key_prefix: "a:b".into(), ..Default::default() };
        assert!(storage.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_offset_and_trial() {
        assert!(ReminderConfig { offset_minutes: 0 }.validate().is_err());
        let auth = AuthConfig { trial_days: 0, ..Default::default() };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut server = ServerConfig { host: "".into(), port: 0 };
        assert!(server.normalize().is_err());
    }

    #[test]
    fn env_secret_overrides_file_secret() -> Result<()> {
        let mut cfg = load_from_str(
            r#"
            [auth]
            jwt_secret = "from-file"
            "#,
        )?;
        cfg.apply_overrides(|key| (key == "JWT_SECRET").then(|| "from-env".to_string()));
        assert_eq!(cfg.auth.jwt_secret, "from-env");
        Ok(())
    }

    #[test]
    fn blank_env_values_keep_file_settings() -> Result<()> {
        let mut cfg = load_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [auth]
            jwt_secret = "from-file"
            "#,
        )?;
        cfg.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(cfg.auth.jwt_secret, "from-file");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);

        cfg.apply_overrides(|_| None);
        assert_eq!(cfg.auth.jwt_secret, "from-file");
        Ok(())
    }
}
