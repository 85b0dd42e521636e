//! Configuration loaded from `~/.config/linkcard/config.toml`.
//!
//! Every key is optional. Environment variables override the file for
//! credentials and credential file paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::TwitterCredentials;
use crate::http_client::{ClientOptions, DEFAULT_USER_AGENT};
use crate::replace::RuleConfig;

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Whole-request timeout for outbound HTTP calls.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound for one scrape. Unset or zero disables it.
    pub deadline_secs: Option<u64>,
    pub reddit: RedditSection,
    pub twitter: TwitterSection,
    pub youtube: YouTubeSection,
    pub title_rules: Vec<RuleConfig>,
    pub description_rules: Vec<RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            timeout_secs: client.timeout.as_secs(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            deadline_secs: None,
            reddit: RedditSection::default(),
            twitter: TwitterSection::default(),
            youtube: YouTubeSection::default(),
            title_rules: Vec::new(),
            description_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RedditSection {
    /// Reddit rejects generic agents; falls back to the crate's own.
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TwitterSection {
    pub consumer_key: String,
    pub consumer_secret: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct YouTubeSection {
    /// OAuth client JSON as downloaded from the Google console.
    pub config_file: Option<PathBuf>,
    /// Stored OAuth token JSON.
    pub token_file: Option<PathBuf>,
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            Self::read(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit path, which must exist, then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Parse configuration text without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override file values with whatever `lookup` returns. Empty values
    /// are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(agent) = var("REDDIT_USER_AGENT") {
            self.reddit.user_agent = Some(agent);
        }
        if let Some(key) = var("TWITTER_CONSUMER_KEY") {
            self.twitter.consumer_key = key;
        }
        if let Some(secret) = var("TWITTER_CONSUMER_SECRET") {
            self.twitter.consumer_secret = secret;
        }
        if let Some(path) = var("YOUTUBE_CONFIG_FILE") {
            self.youtube.config_file = Some(PathBuf::from(path));
        }
        if let Some(path) = var("YOUTUBE_TOKEN_FILE") {
            self.youtube.token_file = Some(PathBuf::from(path));
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientOptions::default()
        }
    }

    pub fn reddit_user_agent(&self) -> &str {
        self.reddit.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn twitter_credentials(&self) -> TwitterCredentials {
        TwitterCredentials::new(&self.twitter.consumer_key, &self.twitter.consumer_secret)
    }

    /// Both YouTube files, or `None` when either is unset.
    pub fn youtube_files(&self) -> Option<(&Path, &Path)> {
        match (&self.youtube.config_file, &self.youtube.token_file) {
            (Some(config), Some(token)) => Some((config, token)),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkcard")
        .join("config.toml")
}
