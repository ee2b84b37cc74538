use anyhow::Context;
use camino::{
    Utf8Path,
    Utf8PathBuf,
};
use dropcam::{
    Endpoints,
    DEFAULT_IMAGE_WIDTH,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    time::Duration,
};

/// The env var that holds the account username.
pub const USERNAME_ENV: &str = "DROPCAM_USERNAME";

/// The env var that holds the account password.
pub const PASSWORD_ENV: &str = "DROPCAM_PASSWORD";

fn default_api_base() -> String {
    "https://www.dropcam.com".to_string()
}

fn default_nexus_base() -> String {
    "https://nexusapi.dropcam.com".to_string()
}

fn default_image_width() -> u32 {
    DEFAULT_IMAGE_WIDTH
}

fn default_event_window() -> u64 {
    60 * 60
}

fn default_out_dir() -> Utf8PathBuf {
    ".".into()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Deserialize, Debug)]
pub struct Config {
    /// The account username
    #[serde(default)]
    pub username: Option<String>,

    /// The account password
    #[serde(default)]
    pub password: Option<String>,

    /// The main api host
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// The media api host
    #[serde(default = "default_nexus_base")]
    pub nexus_base: String,

    /// The width to request images at
    #[serde(default = "default_image_width")]
    pub image_width: u32,

    /// How far back to list events, in seconds
    #[serde(default = "default_event_window")]
    pub event_window: u64,

    /// Where snapshots are saved
    #[serde(default = "default_out_dir")]
    pub out_dir: Utf8PathBuf,

    /// An optional file to also log to
    #[serde(default)]
    pub log_file: Option<Utf8PathBuf>,

    /// The http request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(flatten)]
    pub extra: HashMap<String, toml::Value>,
}

impl Config {
    /// Load a config from a path.
    ///
    /// A missing file is treated as an empty config.
    pub fn load_from_path(path: &Utf8Path) -> anyhow::Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config from '{path}'"));
            }
        };

        Self::load_from_str(&data)
    }

    /// Load a config from a str
    pub fn load_from_str(data: &str) -> anyhow::Result<Self> {
        toml::from_str(data).context("failed to parse config")
    }

    /// Overlay credentials from the environment.
    pub fn apply_env(&mut self) {
        self.apply_credentials(
            std::env::var(USERNAME_ENV).ok(),
            std::env::var(PASSWORD_ENV).ok(),
        );
    }

    /// Overlay credentials, replacing the ones from the file if present.
    pub fn apply_credentials(&mut self, username: Option<String>, password: Option<String>) {
        if let Some(username) = username {
            self.username = Some(username);
        }

        if let Some(password) = password {
            self.password = Some(password);
        }
    }

    /// Get the username and password, if both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }

    /// Get the api hosts
    pub fn endpoints(&self) -> Result<Endpoints, url::ParseError> {
        Endpoints::new(&self.api_base, &self.nexus_base)
    }

    /// Get the http request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Validate a config
    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut errors = Vec::new();

        if self.username.as_deref().unwrap_or_default().is_empty() {
            errors.push(ValidationMessage {
                severity: Severity::Error,
                error: ValidationError::MissingUsername,
            });
        }

        if self.password.as_deref().unwrap_or_default().is_empty() {
            errors.push(ValidationMessage {
                severity: Severity::Error,
                error: ValidationError::MissingPassword,
            });
        }

        if self.image_width == 0 {
            errors.push(ValidationMessage {
                severity: Severity::Error,
                error: ValidationError::ZeroImageWidth,
            });
        }

        if let Err(e) = url::Url::parse(&self.api_base) {
            errors.push(ValidationMessage {
                severity: Severity::Error,
                error: ValidationError::InvalidUrl {
                    key: "api_base",
                    error: e,
                },
            });
        }

        if let Err(e) = url::Url::parse(&self.nexus_base) {
            errors.push(ValidationMessage {
                severity: Severity::Error,
                error: ValidationError::InvalidUrl {
                    key: "nexus_base",
                    error: e,
                },
            });
        }

        let mut unknown_keys: Vec<_> = self.extra.keys().collect();
        unknown_keys.sort();
        for key in unknown_keys {
            errors.push(ValidationMessage {
                severity: Severity::Warn,
                error: ValidationError::UnknownKey(key.clone()),
            });
        }

        errors
    }
}

#[derive(Debug)]
pub struct ValidationMessage {
    severity: Severity,
    error: ValidationError,
}

impl ValidationMessage {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn error(&self) -> &ValidationError {
        &self.error
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("missing username, set `username` or `{}`", USERNAME_ENV)]
    MissingUsername,

    #[error("missing password, set `password` or `{}`", PASSWORD_ENV)]
    MissingPassword,

    #[error("`image_width` must not be 0")]
    ZeroImageWidth,

    #[error("invalid url for `{key}`: {error}")]
    InvalidUrl {
        key: &'static str,
        error: url::ParseError,
    },

    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}
