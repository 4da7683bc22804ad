use std::time::Duration;

use crate::{ApiError, ApiErrorKind};

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "DEEP_READER_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL that endpoint paths are appended to, e.g. `http://host:8000/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between job status queries.
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

impl ClientSettings {
    /// Defaults overridden by `DEEP_READER_API_URL` when it is set and non-empty.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut settings = Self::default();
        if let Some(raw) = lookup(API_URL_ENV) {
            let raw = raw.trim();
            if !raw.is_empty() {
                settings.base_url = raw.to_string();
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        let url = url::Url::parse(&self.base_url).map_err(|err| {
            ApiError::new(
                ApiErrorKind::InvalidUrl,
                format!("invalid API base url '{}': {err}", self.base_url),
            )
        })?;
        if url.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiErrorKind::InvalidUrl,
                format!("API base url '{}' cannot carry paths", self.base_url),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_uses_default() {
        let settings = ClientSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.base_url, DEFAULT_API_URL);
        assert_eq!(settings.poll_interval, Duration::from_millis(2000));
    }

    #[test]
    fn env_overrides_base_url() {
        let settings = ClientSettings::from_lookup(|key| {
            (key == API_URL_ENV).then(|| " http://10.0.0.5:9000/api ".to_string())
        })
        .unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.5:9000/api");
    }

    #[test]
    fn blank_env_is_ignored() {
        let settings = ClientSettings::from_lookup(|_| Some("   ".to_string())).unwrap();
        assert_eq!(settings.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_env_is_rejected() {
        let err = ClientSettings::from_lookup(|_| Some("not a url".to_string())).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidUrl);
    }
}
