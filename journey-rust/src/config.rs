use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL_ID: &str = "deepseek-chat";

/// What the journey does when review synthesis fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewFailurePolicy {
    /// Show the offline review as if it had been generated.
    #[default]
    Fallback,
    /// Return to the last question with an alert and keep the answers.
    RouteBack,
}

impl FromStr for ReviewFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "route-back" | "route_back" => Ok(Self::RouteBack),
            other => Err(format!("unknown review failure policy \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_id: String,
    pub inspiration_temperature: f64,
    pub review_temperature: f64,
    pub chat_temperature: f64,
    pub review_failure_policy: ReviewFailurePolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            inspiration_temperature: 1.2,
            review_temperature: 1.1,
            chat_temperature: 1.0,
            review_failure_policy: ReviewFailurePolicy::Fallback,
        }
    }
}

impl GenerationConfig {
    /// Reads `CAPSULE_API_KEY` (or `API_KEY`), `CAPSULE_BASE_URL`,
    /// `CAPSULE_MODEL` and `CAPSULE_REVIEW_FAILURE` from the process
    /// environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("CAPSULE_API_KEY").or_else(|| lookup("API_KEY"));
        let config = Self {
            api_key,
            base_url: lookup("CAPSULE_BASE_URL").unwrap_or_else(|| {
                info!("CAPSULE_BASE_URL not set, using default: {DEFAULT_BASE_URL}");
                defaults.base_url.clone()
            }),
            model_id: lookup("CAPSULE_MODEL").unwrap_or_else(|| {
                info!("CAPSULE_MODEL not set, using default: {DEFAULT_MODEL_ID}");
                defaults.model_id.clone()
            }),
            review_failure_policy: parse_or_default(
                "CAPSULE_REVIEW_FAILURE",
                lookup("CAPSULE_REVIEW_FAILURE"),
                defaults.review_failure_policy,
            ),
            ..defaults
        };

        match config.usable_api_key() {
            Some(_) => info!("Using API key {}", config.masked_api_key()),
            None => warn!("No usable API key configured, running in offline mode"),
        }

        config
    }

    /// The API key, unless it is missing or obviously a placeholder.
    #[must_use]
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| key.len() > 5 && *key != "undefined")
    }

    /// The key with everything but its first and last four characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let Some(key) = self.usable_api_key() else {
            return "<none>".to_string();
        };
        match (key.get(..4), key.get(key.len().saturating_sub(4)..)) {
            (Some(head), Some(tail)) if key.len() > 8 => format!("{head}...{tail}"),
            _ => "***".to_string(),
        }
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = value else {
        return default;
    };
    value.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> GenerationConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GenerationConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_deepseek_offline() {
        let config = config_from(&[]);
        assert_eq!(config, GenerationConfig::default());
        assert_eq!(config.base_url, "https://api.deepseek.com");
        assert_eq!(config.model_id, "deepseek-chat");
        assert_eq!(config.usable_api_key(), None);
    }

    #[test]
    fn reads_overrides_and_falls_back_to_api_key() {
        let config = config_from(&[
            ("API_KEY", "sk-legacy-123456"),
            ("CAPSULE_MODEL", "deepseek-reasoner"),
            ("CAPSULE_REVIEW_FAILURE", "route-back"),
        ]);
        assert_eq!(config.usable_api_key(), Some("sk-legacy-123456"));
        assert_eq!(config.model_id, "deepseek-reasoner");
        assert_eq!(config.review_failure_policy, ReviewFailurePolicy::RouteBack);

        let config = config_from(&[
            ("CAPSULE_API_KEY", "sk-new-abcdef"),
            ("API_KEY", "sk-old-abcdef"),
        ]);
        assert_eq!(config.usable_api_key(), Some("sk-new-abcdef"));
    }

    #[test]
    fn placeholder_keys_mean_offline() {
        for key in ["undefined", "abc", "   "] {
            let config = config_from(&[("CAPSULE_API_KEY", key)]);
            assert_eq!(config.usable_api_key(), None, "{key:?} should be unusable");
        }
    }

    #[test]
    fn invalid_policy_keeps_default() {
        let config = config_from(&[("CAPSULE_REVIEW_FAILURE", "panic")]);
        assert_eq!(config.review_failure_policy, ReviewFailurePolicy::Fallback);
    }

    #[test]
    fn masks_the_key() {
        let config = config_from(&[("CAPSULE_API_KEY", "sk-1234567890abcd")]);
        assert_eq!(config.masked_api_key(), "sk-1...abcd");
    }
}
