//! Client settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::loader::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the API, without the `/api` prefix.
    pub base_url: String,
    /// Attempts per list load before the error panel is shown.
    pub retries: u32,
    /// Linear backoff step: attempt `n` waits `n × backoff_base_ms`.
    pub backoff_base_ms: u64,
    /// Per-request timeout of the HTTP transport.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retries: 3,
            backoff_base_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retries,
            base_delay: Duration::from_millis(self.backoff_base_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"base_url":"http://shop.local"}"#).unwrap();
        assert_eq!(config.base_url, "http://shop.local");
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_policy().delay_after(2), Duration::from_millis(2000));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
