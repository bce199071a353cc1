use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Base URL that share links and uploaded files are published under
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Address the share server listens on
    #[serde(default = "default_share_bind")]
    pub share_bind: String,

    /// Directory uploaded receipts, logos, quotations and avatars are copied into
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Directory exported reports are written to
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Log file used while the terminal dashboard owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_share_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_report_dir() -> String {
    "reports".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_log_file() -> String {
    "freelance-manager.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SMTP settings, present only when a host and sender are configured
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Public base URL without a trailing slash
    pub fn public_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }

    pub fn smtp(&self) -> Option<SmtpSettings> {
        let host = self.smtp_host.as_ref().filter(|h| !h.is_empty())?;
        let from = self.smtp_from.as_ref().filter(|f| !f.is_empty())?;

        Some(SmtpSettings {
            host: host.clone(),
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from: from.clone(),
        })
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/freelance".to_string(),
        public_url: "https://freelance.example.com/".to_string(),
        share_bind: default_share_bind(),
        upload_dir: default_upload_dir(),
        report_dir: default_report_dir(),
        github_api_url: default_github_api_url(),
        log_file: default_log_file(),
        log_level: default_log_level(),
        smtp_host: None,
        smtp_username: None,
        smtp_password: None,
        smtp_from: None,
    }
}
