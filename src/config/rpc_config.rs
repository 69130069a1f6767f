//! Configuration for RPC endpoints.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Configuration for an RPC endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcConfig {
    /// The RPC endpoint URL.
    pub url: String,
    /// Preference among several endpoints; the highest weight is used.
    /// If not specified, a default weight of 1 is used.
    pub weight: Option<u32>,
}

impl RpcConfig {
    /// Creates a new RPC configuration with the given URL and default weight (1).
    pub fn new(url: String) -> Self {
        Self {
            url,
            weight: Some(1),
        }
    }

    /// Creates a new RPC configuration with the given URL and weight.
    pub fn with_weight(url: String, weight: u32) -> Self {
        Self {
            url,
            weight: Some(weight),
        }
    }

    /// Gets the weight of this RPC endpoint, defaulting to 1 if not specified.
    pub fn get_weight(&self) -> u32 {
        self.weight.unwrap_or(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.url)
            .map_err(|e| ConfigError::InvalidRpcUrl(format!("{}: {}", self.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRpcUrl(format!(
                "{}: scheme must be http or https",
                self.url
            )));
        }

        if self.weight == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "rpc.weight".to_string(),
                reason: "weight must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_config_with_default_weight() {
        let url = "https://example.com".to_string();
        let config = RpcConfig::new(url.clone());

        assert_eq!(config.url, url);
        assert_eq!(config.weight, Some(1));
    }

    #[test]
    fn test_with_weight_creates_config_with_custom_weight() {
        let config = RpcConfig::with_weight("https://example.com".to_string(), 5);

        assert_eq!(config.weight, Some(5));
        assert_eq!(config.get_weight(), 5);
    }

    #[test]
    fn test_get_weight_returns_default_when_none() {
        let config = RpcConfig {
            url: "https://example.com".to_string(),
            weight: None,
        };

        assert_eq!(config.get_weight(), 1);
    }

    #[test]
    fn test_validate_accepts_http_urls() {
        assert!(RpcConfig::new("https://api.devnet.solana.com".to_string())
            .validate()
            .is_ok());
        assert!(RpcConfig::new("http://127.0.0.1:8899".to_string())
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let result = RpcConfig::new("not a url".to_string()).validate();
        assert!(matches!(result, Err(ConfigError::InvalidRpcUrl(_))));

        let result = RpcConfig::new("ftp://example.com".to_string()).validate();
        assert!(matches!(result, Err(ConfigError::InvalidRpcUrl(_))));
    }

    #[test]
    fn test_validate_rejects_zero_weight() {
        let result = RpcConfig::with_weight("https://example.com".to_string(), 0).validate();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
