//! Inference backend settings, resolved from the environment.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default local Ollama endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default request timeout (2 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENDPOINT_ENV_VAR: &str = "DINY_OLLAMA_URL";
pub const MODEL_ENV_VAR: &str = "DINY_MODEL";
pub const TIMEOUT_ENV_VAR: &str = "DINY_TIMEOUT";

/// Where and how to reach the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceSettings {
    /// Base URL, without trailing slash.
    pub endpoint: String,
    pub model: String,
    /// Bound on connecting and receiving response headers.
    pub timeout: Duration,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl InferenceSettings {
    /// Read DINY_OLLAMA_URL, DINY_MODEL and DINY_TIMEOUT, falling back to
    /// defaults for unset or empty values.
    pub fn from_env() -> Self {
        Self {
            endpoint: non_empty_var(ENDPOINT_ENV_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: get_timeout(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the streaming generation endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Logs a warning if DINY_TIMEOUT is set but not a positive number of seconds.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 3] = [ENDPOINT_ENV_VAR, MODEL_ENV_VAR, TIMEOUT_ENV_VAR];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(ALL_VARS, || {
            assert_eq!(InferenceSettings::from_env(), InferenceSettings::default());
        });
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                (ENDPOINT_ENV_VAR, Some("http://gpu-box:11434/")),
                (MODEL_ENV_VAR, Some("qwen2.5-coder")),
                (TIMEOUT_ENV_VAR, Some("30")),
            ],
            || {
                let settings = InferenceSettings::from_env();
                assert_eq!(settings.endpoint, "http://gpu-box:11434");
                assert_eq!(settings.model, "qwen2.5-coder");
                assert_eq!(settings.timeout, Duration::from_secs(30));
            },
        );
    }

    #[test]
    fn test_invalid_timeout_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("soon"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("0"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_empty_model_uses_default() {
        temp_env::with_var(MODEL_ENV_VAR, Some("  "), || {
            assert_eq!(InferenceSettings::from_env().model, DEFAULT_MODEL);
        });
    }

    #[test]
    fn test_generate_url() {
        let settings = InferenceSettings::default().with_endpoint("http://localhost:9999/");
        assert_eq!(settings.generate_url(), "http://localhost:9999/api/generate");
    }
}
