//! cryptorun-config
//!
//! Layered YAML configuration loading (§6), canonical-hash computation, and
//! schema validation for the recognized options table (§6) — notably the
//! `regime_weights` sum=1.0 invariant enforced at load (§3/§8).

mod merge;
mod secrets;
mod types;

pub use merge::{load_layered_yaml, LoadedConfig};
pub use secrets::{resolve_provider_secrets, ResolvedProviderSecrets};
pub use types::CryptoRunConfig;

use anyhow::{bail, Context, Result};
use cryptorun_schemas::Regime;

/// Load, merge, and validate layered config files into a `CryptoRunConfig`.
///
/// Validation failures here are the caller's signal to exit with the
/// config-error exit code (§6: code 2).
pub fn load_config(paths: &[&str]) -> Result<(CryptoRunConfig, LoadedConfig)> {
    let loaded = load_layered_yaml(paths)?;

    let mut defaults = serde_json::to_value(CryptoRunConfig::default())
        .context("serialize default config failed")?;
    merge_into(&mut defaults, loaded.config_json.clone());

    let cfg: CryptoRunConfig =
        serde_json::from_value(defaults).context("config did not match recognized schema")?;

    validate(&cfg)?;

    Ok((cfg, loaded))
}

fn merge_into(dst: &mut serde_json::Value, src: serde_json::Value) {
    match (dst, src) {
        (serde_json::Value::Object(dst_map), serde_json::Value::Object(src_map)) => {
            for (k, v) in src_map {
                match dst_map.get_mut(&k) {
                    Some(existing) => merge_into(existing, v),
                    None => {
                        dst_map.insert(k, v);
                    }
                }
            }
        }
        (dst_slot, src_val) => *dst_slot = src_val,
    }
}

/// Validate invariants that `serde`'s schema check alone cannot express.
fn validate(cfg: &CryptoRunConfig) -> Result<()> {
    for r in Regime::ALL {
        match cfg.regime_weights.get(&r) {
            None => bail!("regime_weights missing entry for regime '{r}'"),
            Some(w) if !w.is_valid() => bail!(
                "regime_weights['{r}'] is invalid: weights must be non-negative and sum to 1.0 (got {})",
                w.sum()
            ),
            Some(_) => {}
        }
    }

    if cfg.top_n == 0 {
        bail!("top_n must be > 0");
    }
    if cfg.microstructure_venues.is_empty() {
        bail!("microstructure.venues must not be empty");
    }
    if cfg.guard_latefill_cooldown_secs <= 0 {
        bail!("guard.latefill.cooldown must be > 0");
    }

    Ok(())
}
