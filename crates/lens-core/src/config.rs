use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://lens.google.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:103.0) Gecko/20100101 Firefox/103.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LensConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl LensConfig {
    /// Defaults overridden by `LENS_BASE_URL`, `LENS_USER_AGENT` and
    /// `LENS_TIMEOUT_MS` where set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: get("LENS_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: get("LENS_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_ms: get("LENS_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
        }
    }
}
