//! Verifier configuration.
//!
//! Defaults describe a conventional single-host deployment: a Django-style
//! application under `/srv/app`, served by gunicorn behind nginx with a
//! celery worker. Any field can be overridden from a TOML file; paths left
//! unset are derived from `app_dir`.
//!
//! ```toml
//! app_dir = "/srv/shop"
//! services = ["gunicorn"]
//! health_url = "http://localhost:8000/healthz"
//! poll_timeout_secs = 60
//! ```

use crate::engine::poll::PollPolicy;
use crate::PreflightError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Variables the application cannot start without.
pub const REQUIRED_VARS: [&str; 3] = ["SECRET_KEY", "DATABASE_URL", "ENVIRONMENT"];

/// Keywords that flag a log line as an error (matched case-insensitively).
pub const ERROR_PATTERNS: [&str; 4] = ["ERROR", "CRITICAL", "Traceback", "Exception"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Application root; `manage.py` lives here
    pub app_dir: PathBuf,
    /// `.env` file (default: `<app_dir>/.env`)
    pub env_file: Option<PathBuf>,
    pub required_vars: Vec<String>,
    /// Python interpreter used to run `manage.py`
    pub python: String,
    /// Directories that must be readable and writable
    /// (default: `<app_dir>/media`, `<app_dir>/staticfiles`, `<app_dir>/logs`)
    pub writable_dirs: Option<Vec<PathBuf>>,
    /// Collected static files (default: `<app_dir>/staticfiles`)
    pub static_dir: Option<PathBuf>,
    /// Application units checked with `systemctl is-active`
    pub services: Vec<String>,
    pub reverse_proxy: String,
    pub health_url: String,
    /// Requested once after the health check succeeds
    pub endpoints: Vec<String>,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub http_timeout_secs: u64,
    /// Log files scanned for errors
    /// (default: `<app_dir>/logs/app.log`, `/var/log/nginx/error.log`)
    pub log_files: Option<Vec<PathBuf>>,
    pub log_tail_lines: usize,
    pub error_patterns: Vec<String>,
    pub command_timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            app_dir: PathBuf::from("/srv/app"),
            env_file: None,
            required_vars: REQUIRED_VARS.iter().map(|v| v.to_string()).collect(),
            python: "python".to_string(),
            writable_dirs: None,
            static_dir: None,
            services: vec!["gunicorn".to_string(), "celery".to_string()],
            reverse_proxy: "nginx".to_string(),
            health_url: "http://localhost/health/".to_string(),
            endpoints: vec![
                "http://localhost/".to_string(),
                "http://localhost/admin/login/".to_string(),
            ],
            poll_interval_secs: 5,
            poll_timeout_secs: 120,
            http_timeout_secs: 10,
            log_files: None,
            log_tail_lines: 100,
            error_patterns: ERROR_PATTERNS.iter().map(|p| p.to_string()).collect(),
            command_timeout_secs: 30,
        }
    }
}

impl VerifierConfig {
    /// Load from a TOML file, or defaults when `path` is None.
    pub fn load(path: Option<&Path>) -> Result<Self, PreflightError> {
        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| PreflightError::IoError {
                        context: format!("reading config {}", path.display()),
                        message: e.to_string(),
                    })?;
                Self::from_toml(&content)?
            }
            None => VerifierConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, PreflightError> {
        toml::from_str(content).map_err(|e| PreflightError::ParseError {
            context: "config".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), PreflightError> {
        if self.poll_interval_secs == 0 {
            return Err(PreflightError::ConfigError(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.poll_timeout_secs < self.poll_interval_secs {
            return Err(PreflightError::ConfigError(format!(
                "poll_timeout_secs ({}) must be at least poll_interval_secs ({})",
                self.poll_timeout_secs, self.poll_interval_secs
            )));
        }
        if self.log_tail_lines == 0 {
            return Err(PreflightError::ConfigError(
                "log_tail_lines must be greater than 0".to_string(),
            ));
        }
        if self.health_url.trim().is_empty() {
            return Err(PreflightError::ConfigError("health_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| self.app_dir.join(".env"))
    }

    pub fn writable_dir_paths(&self) -> Vec<PathBuf> {
        self.writable_dirs.clone().unwrap_or_else(|| {
            ["media", "staticfiles", "logs"]
                .iter()
                .map(|d| self.app_dir.join(d))
                .collect()
        })
    }

    pub fn static_dir_path(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| self.app_dir.join("staticfiles"))
    }

    pub fn log_file_paths(&self) -> Vec<PathBuf> {
        self.log_files.clone().unwrap_or_else(|| {
            vec![
                self.app_dir.join("logs").join("app.log"),
                PathBuf::from("/var/log/nginx/error.log"),
            ]
        })
    }

    /// Application services followed by the reverse proxy.
    pub fn all_services(&self) -> Vec<String> {
        let mut services = self.services.clone();
        if !self.reverse_proxy.is_empty() {
            services.push(self.reverse_proxy.clone());
        }
        services
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_secs(self.poll_interval_secs),
            Duration::from_secs(self.poll_timeout_secs),
        )
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
