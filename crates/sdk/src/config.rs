use greentick_types::DEFAULT_API_URL;
use url::Url;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "GREENTICK_API_URL";

/// Configuration for [`crate::ApiClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the GreenTick backend, without trailing slash
    pub base_url: Url,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url`
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
        })
    }

    /// Read the base URL from [`API_URL_ENV`], falling back to the default.
    pub fn from_env() -> Result<Self, url::ParseError> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Join `path` (which may carry a query string) onto the base URL.
    ///
    /// Any path prefix on the base URL is preserved.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            Url::parse(&format!("{}{}", base, path))
        } else {
            Url::parse(&format!("{}/{}", base, path))
        }
    }
}
