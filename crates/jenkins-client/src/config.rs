//! Connection configuration for the upstream Jenkins server.

use std::env;

/// Environment variables the configuration is read from.
const ENV_URL: &str = "JENKINS_URL";
const ENV_USERNAME: &str = "JENKINS_USERNAME";
const ENV_API_TOKEN: &str = "JENKINS_API_TOKEN";

/// Errors raised while assembling the connection configuration.
///
/// These are fatal: the process refuses to serve without a complete,
/// valid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error("missing required environment variables: {0}")]
    MissingVars(String),

    /// The base URL does not parse as an absolute http(s) URL.
    #[error("JENKINS_URL is not a valid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Immutable connection settings for one Jenkins server.
///
/// Created once at process start and owned by the client for the lifetime
/// of the process.
#[derive(Debug, Clone)]
pub struct JenkinsConfig {
    base_url: String,
    username: String,
    api_token: String,
}

impl JenkinsConfig {
    /// Validates and normalizes the connection settings.
    ///
    /// The base URL is trimmed and stripped of its trailing slash; it must
    /// parse as an absolute `http` or `https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is malformed or
    /// uses an unsupported scheme.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');

        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|err| ConfigError::InvalidBaseUrl(format!("{trimmed}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{trimmed}: scheme must be http or https"
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            username: username.into(),
            api_token: api_token.into(),
        })
    }

    /// Reads the configuration from `JENKINS_URL`, `JENKINS_USERNAME` and
    /// `JENKINS_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVars`] naming every variable that is
    /// unset or blank, or [`ConfigError::InvalidBaseUrl`] if the URL does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            let value = lookup(key).filter(|value| !value.trim().is_empty());
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };

        let base_url = required(ENV_URL);
        let username = required(ENV_USERNAME);
        let api_token = required(ENV_API_TOKEN);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing.join(", ")));
        }

        Self::new(base_url, username, api_token)
    }

    /// Normalized base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Account used for HTTP basic auth.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// API token used as the basic-auth password.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}
