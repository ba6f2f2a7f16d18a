use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Expiry applied by [`MutationGuard::with_guard`](crate::MutationGuard::with_guard).
    pub default_ttl: Duration,
    /// Prepended to every rendered [`LogicalKey`](crate::LogicalKey).
    pub key_prefix: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(60),
            key_prefix: String::new(),
        }
    }
}

impl GuardConfig {
    /// Defaults overridden by `GUARD_TTL_SECONDS` and `GUARD_KEY_PREFIX`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup("GUARD_TTL_SECONDS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.default_ttl = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid GUARD_TTL_SECONDS"),
            }
        }
        if let Some(prefix) = lookup("GUARD_KEY_PREFIX") {
            config.key_prefix = prefix;
        }
        config
    }
}
