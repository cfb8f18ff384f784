//! Secrets resolution for provider API credentials.
//!
//! Config YAML stores only **env var NAMES**; callers invoke
//! `resolve_provider_secrets` once at startup and pass the result into
//! provider constructors. Never scatter `std::env::var` calls across the
//! codebase. `Debug` redacts values; error messages reference the env var
//! name, never the value.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Resolved API keys, keyed by venue name (e.g. `"binance"`).
#[derive(Clone, Default)]
pub struct ResolvedProviderSecrets {
    keys: BTreeMap<String, String>,
}

impl std::fmt::Debug for ResolvedProviderSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted: BTreeMap<&str, &str> =
            self.keys.keys().map(|k| (k.as_str(), "<REDACTED>")).collect();
        f.debug_struct("ResolvedProviderSecrets")
            .field("keys", &redacted)
            .finish()
    }
}

impl ResolvedProviderSecrets {
    pub fn get(&self, venue: &str) -> Option<&str> {
        self.keys.get(venue).map(|s| s.as_str())
    }
}

/// Resolve `{venue: ENV_VAR_NAME}` pairs from the process environment.
///
/// `required` venues must resolve to a non-empty value or this fails with the
/// env var *name* (never its value) in the error.
pub fn resolve_provider_secrets(
    env_var_names: &BTreeMap<String, String>,
    required: &[&str],
) -> Result<ResolvedProviderSecrets> {
    let mut keys = BTreeMap::new();
    for (venue, env_name) in env_var_names {
        if let Ok(val) = std::env::var(env_name) {
            if !val.trim().is_empty() {
                keys.insert(venue.clone(), val);
            }
        }
    }
    for venue in required {
        if !keys.contains_key(*venue) {
            let env_name = env_var_names
                .get(*venue)
                .map(String::as_str)
                .unwrap_or("<unmapped>");
            bail!("missing required credential for venue '{venue}' (env var {env_name})");
        }
    }
    Ok(ResolvedProviderSecrets { keys })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_secret_value() {
        let mut env_names = BTreeMap::new();
        env_names.insert("binance".to_string(), "CRYPTORUN_TEST_KEY_XYZ".to_string());
        std::env::set_var("CRYPTORUN_TEST_KEY_XYZ", "super-secret-value");

        let resolved = resolve_provider_secrets(&env_names, &[]).unwrap();
        let debug_str = format!("{resolved:?}");

        assert!(!debug_str.contains("super-secret-value"));
        assert!(debug_str.contains("REDACTED"));
        std::env::remove_var("CRYPTORUN_TEST_KEY_XYZ");
    }

    #[test]
    fn missing_required_secret_errors_with_env_name_not_value() {
        let env_names = BTreeMap::new();
        let err = resolve_provider_secrets(&env_names, &["binance"]).unwrap_err();
        assert!(err.to_string().contains("binance"));
    }
}
