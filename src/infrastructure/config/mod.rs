//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Service configuration. Omitted sections take their defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub drive: DriveConfig,
    pub dispatch: DispatchConfig,
    pub summarizer: SummarizerConfig,
    pub twilio: TwilioConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DriveConfig {
    /// Local directory backing the drive
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DispatchConfig {
    /// Upper bound on one handler invocation
    pub handler_timeout_secs: u64,
    /// Entries returned by `GET /logs` when no limit is given
    pub recent_limit: usize,
}

/// Which summarization backend SUMMARY uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    None,
    Remote,
    Groq,
}

impl Default for SummarizerProvider {
    fn default() -> Self {
        Self::None
    }
}

impl std::str::FromStr for SummarizerProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "remote" => Ok(Self::Remote),
            "groq" => Ok(Self::Groq),
            other => Err(ConfigError::InvalidValue(format!("summarizer provider '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SummarizerConfig {
    pub provider: SummarizerProvider,
    /// Remote function URL
    pub endpoint: Option<String>,
    /// Bearer key for the remote function
    pub api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Upper bound on one media download
    #[serde(default = "default_media_timeout_secs")]
    pub media_timeout_secs: u64,
}

fn default_media_timeout_secs() -> u64 {
    20
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            media_timeout_secs: default_media_timeout_secs(),
        }
    }
}

impl TwilioConfig {
    /// Basic-auth pair for media downloads, when both halves are set
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => Some((sid.clone(), token.clone())),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0:8080".to_string(),
            },
            database: DatabaseConfig {
                path: PathBuf::from("drivebot.db"),
            },
            drive: DriveConfig {
                root: PathBuf::from("./drive"),
            },
            dispatch: DispatchConfig {
                handler_timeout_secs: 30,
                recent_limit: 10,
            },
            summarizer: SummarizerConfig {
                provider: SummarizerProvider::None,
                endpoint: None,
                api_key: None,
                groq_api_key: None,
                groq_model: None,
                timeout_secs: 25,
            },
            twilio: TwilioConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("DRIVEBOT_BIND") {
            self.server.bind = bind;
        }
        if let Some(path) = lookup("DRIVEBOT_DATABASE") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(root) = lookup("DRIVE_ROOT") {
            self.drive.root = PathBuf::from(root);
        }
        if let Some(secs) = lookup("HANDLER_TIMEOUT_SECS") {
            self.dispatch.handler_timeout_secs = secs
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("HANDLER_TIMEOUT_SECS={}", secs)))?;
        }
        if let Some(provider) = lookup("SUMMARIZER_PROVIDER") {
            self.summarizer.provider = provider.parse()?;
        }
        if let Some(url) = lookup("SUMMARIZER_URL") {
            self.summarizer.endpoint = Some(url);
        }
        if let Some(key) = lookup("SUMMARIZER_API_KEY") {
            self.summarizer.api_key = Some(key);
        }
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.summarizer.groq_api_key = Some(key);
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            self.summarizer.groq_model = Some(model);
        }
        if let Some(sid) = lookup("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = Some(sid);
        }
        if let Some(token) = lookup("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = Some(token);
        }
        if let Some(secs) = lookup("MEDIA_TIMEOUT_SECS") {
            self.twilio.media_timeout_secs = secs
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("MEDIA_TIMEOUT_SECS={}", secs)))?;
        }
        Ok(())
    }

    /// Reject settings that cannot work together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.handler_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("dispatch.handler-timeout-secs must be positive".to_string()));
        }
        // Collaborator bounds only take effect below the handler bound
        for (name, secs) in [
            ("summarizer.timeout-secs", self.summarizer.timeout_secs),
            ("twilio.media-timeout-secs", self.twilio.media_timeout_secs),
        ] {
            if secs == 0 || secs > self.dispatch.handler_timeout_secs {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be between 1 and dispatch.handler-timeout-secs ({})",
                    name, self.dispatch.handler_timeout_secs
                )));
            }
        }
        match self.summarizer.provider {
            SummarizerProvider::Remote if self.summarizer.endpoint.is_none() => {
                Err(ConfigError::MissingField("summarizer.endpoint".to_string()))
            }
            SummarizerProvider::Groq if self.summarizer.groq_api_key.is_none() => {
                Err(ConfigError::MissingField("summarizer.groq-api-key".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.handler_timeout_secs)
    }

    pub fn summarizer_timeout(&self) -> Duration {
        Duration::from_secs(self.summarizer.timeout_secs)
    }

    pub fn media_timeout(&self) -> Duration {
        Duration::from_secs(self.twilio.media_timeout_secs)
    }
}
