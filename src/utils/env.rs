//! Process environment lookups
//!
//! Only process-level settings are read here (`HEXINZ_CONFIG`, `RUST_LOG`,
//! `NO_COLOR`). Configuration keys are overridden through
//! [`crate::config::Configuration::with_env_overrides`] instead.

/// Value of `key`, or `default` when it is unset or empty
///
/// # Example
/// ```rust
/// use hexinz_runner::utils::env_or_default;
///
/// let config_path = env_or_default("HEXINZ_CONFIG", "hexinz.toml");
/// ```
pub fn env_or_default(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Value of `key` if it is set to something non-empty
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
