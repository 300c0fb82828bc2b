use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::{AppError, ErrorKind, CHAT_TIMEOUT, PREDICTION_TIMEOUT};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Baked in at build time; the shell may still override it with `Event::ApiConfigured`.
const API_URL_ENV: Option<&str> = option_env!("DOCTORAI_API_URL");

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid URL '{url}': {reason}")]
pub struct InvalidUrl {
    pub url: String,
    pub reason: String,
}

impl From<InvalidUrl> for AppError {
    fn from(error: InvalidUrl) -> Self {
        AppError::new(ErrorKind::Internal, "Invalid request").with_internal(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    pub prediction_timeout: Duration,
    pub chat_timeout: Duration,
}

impl ApiConfig {
    /// Reads the compile-time base URL, falling back to the local default
    /// when the variable is unset or does not parse.
    #[must_use]
    pub fn from_env() -> Self {
        let configured = API_URL_ENV
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| match Self::parse_base(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring invalid DOCTORAI_API_URL");
                    None
                }
            });

        match configured {
            Some(base_url) => Self::with_url(base_url),
            None => Self::default(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, InvalidUrl> {
        Self::parse_base(base_url).map(Self::with_url)
    }

    fn with_url(base_url: Url) -> Self {
        Self {
            base_url,
            prediction_timeout: PREDICTION_TIMEOUT,
            chat_timeout: CHAT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins `path` onto the base, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Result<String, InvalidUrl> {
        let path = path.trim_start_matches('/');
        self.base_url
            .join(path)
            .map(String::from)
            .map_err(|e| InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn parse_base(raw: &str) -> Result<Url, InvalidUrl> {
        let mut url = Url::parse(raw.trim()).map_err(|e| InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(InvalidUrl {
                url: raw.to_string(),
                reason: "URL must have a host".to_string(),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        match Url::parse(DEFAULT_API_BASE_URL) {
            Ok(url) => Self::with_url(url),
            Err(_) => unreachable!("default API base URL is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(config.prediction_timeout, Duration::from_secs(60));
        assert_eq!(config.chat_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_join() {
        let config = ApiConfig::default();
        assert_eq!(
            config.endpoint("/api/xray").unwrap(),
            "http://localhost:8000/api/xray"
        );

        let config = ApiConfig::with_base_url("https://diag.example.com/v2").unwrap();
        assert_eq!(
            config.endpoint("api/chatbot").unwrap(),
            "https://diag.example.com/v2/api/chatbot"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ApiConfig::with_base_url("ftp://example.com").is_err());
        assert!(ApiConfig::with_base_url("not a url").is_err());
        assert!(ApiConfig::with_base_url("mailto:someone@example.com").is_err());

        let error: AppError = ApiConfig::with_base_url("ftp://example.com")
            .unwrap_err()
            .into();
        assert_eq!(error.kind, ErrorKind::Internal);
        assert!(error
            .internal_message
            .is_some_and(|m| m.contains("unsupported scheme")));
    }
}
