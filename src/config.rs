use std::time::Duration;
use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the completion endpoint. Read-only once built.
///
/// Without an API version the endpoint is addressed OpenAI style
/// (`{endpoint}/chat/completions`, bearer auth). With one it is addressed
/// Azure style (`{endpoint}/openai/deployments/{model}/chat/completions`,
/// `api-key` header) and `model` names the deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub api_version: Option<String>,
    pub timeout: Duration
}

impl ClientConfig {

    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {

        ClientConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.trim().to_string(),
            api_version: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }

    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {

        self.api_version = Some(api_version.trim().to_string());
        self

    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {

        self.timeout = timeout;
        self

    }

    /// Reads `LLM_ENDPOINT`, `LLM_API_KEY`, `LLM_MODEL`, `LLM_API_VERSION`
    /// and `LLM_TIMEOUT_SECS`. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {

        Self::from_lookup(|var| std::env::var(var).ok())

    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {

        // empty values count as unset
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let endpoint = get("LLM_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = get("LLM_API_KEY")
            .ok_or(ConfigError::Missing("LLM_API_KEY"))?;
        let model = get("LLM_MODEL")
            .ok_or(ConfigError::Missing("LLM_MODEL"))?;

        let mut config = ClientConfig::new(&endpoint, &api_key, &model);

        if let Some(version) = get("LLM_API_VERSION") {
            config = config.with_api_version(&version);
        }

        if let Some(raw) = get("LLM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid { var: "LLM_TIMEOUT_SECS", value: raw.clone() })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)

    }

    pub fn completions_url(&self) -> String {

        match &self.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint,
                urlencoding::encode(&self.model),
                urlencoding::encode(version)
            ),
            None => format!("{}/chat/completions", self.endpoint)
        }

    }

    pub fn is_azure(&self) -> bool {

        self.api_version.is_some()

    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {

        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()

    }

    #[test]
    fn test_defaults_endpoint_and_timeout() {

        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-test"),
            ("LLM_MODEL", "gpt-4o-mini")
        ])).expect("config");

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.completions_url(), "https://api.openai.com/v1/chat/completions");
        assert!(!config.is_azure());

    }

    #[test]
    fn test_missing_key_is_reported() {

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LLM_MODEL", "gpt-4o-mini"),
            ("LLM_API_KEY", "   ")
        ])).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("LLM_API_KEY")));

    }

    #[test]
    fn test_azure_addressing() {

        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LLM_ENDPOINT", "https://example.openai.azure.com/"),
            ("LLM_API_KEY", "key"),
            ("LLM_MODEL", "gpt-35-turbo"),
            ("LLM_API_VERSION", "2024-02-01"),
            ("LLM_TIMEOUT_SECS", "5")
        ])).expect("config");

        assert!(config.is_azure());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-35-turbo/chat/completions?api-version=2024-02-01"
        );

    }

    #[test]
    fn test_azure_url_parts_are_trimmed_and_encoded() {

        let config = ClientConfig::new("https://example.openai.azure.com", "key", " team gpt/4o ")
            .with_api_version(" 2024-02-01&x=1 ");

        assert_eq!(
            config.completions_url(),
            "https://example.openai.azure.com/openai/deployments/team%20gpt%2F4o/chat/completions?api-version=2024-02-01%26x%3D1"
        );

    }

    #[test]
    fn test_bad_timeout_is_rejected() {

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "key"),
            ("LLM_MODEL", "m"),
            ("LLM_TIMEOUT_SECS", "soon")
        ])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: "LLM_TIMEOUT_SECS", .. }));

    }

}
