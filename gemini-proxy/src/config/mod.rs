use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Google Generative Language API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Server-held credential. `None` when unset or empty; requests are then
    /// answered with 500 instead of failing startup.
    pub api_key: Option<Secret<String>>,
    pub api_base_url: String,
    pub model: String,
}

impl GoogleConfig {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.and_then(non_empty_secret),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(ProxyConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .as_deref()
                    .and_then(non_empty_secret),
                api_base_url: get_env("GEMINI_API_BASE_URL", DEFAULT_API_BASE_URL),
                model: get_env("GEMINI_MODEL", DEFAULT_MODEL),
            },
        })
    }
}

fn non_empty_secret(value: &str) -> Option<Secret<String>> {
    if value.is_empty() {
        None
    } else {
        Some(Secret::new(value.to_string()))
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn empty_key_counts_as_absent() {
        assert!(GoogleConfig::new(Some("")).api_key.is_none());
        assert!(GoogleConfig::new(None).api_key.is_none());
    }

    #[test]
    fn key_is_kept_and_redacted_in_debug() {
        let google = GoogleConfig::new(Some("AIza-test"));

        let key = google.api_key.as_ref().expect("key should be set");
        assert_eq!(key.expose_secret(), "AIza-test");
        assert!(!format!("{:?}", google).contains("AIza-test"));
    }

    #[test]
    fn defaults_point_at_public_endpoint() {
        let google = GoogleConfig::new(None);
        assert_eq!(
            google.api_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(google.model, "gemini-1.5-flash-latest");
    }
}
