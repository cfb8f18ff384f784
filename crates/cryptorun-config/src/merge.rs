use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

/// Load + deep-merge YAML files in order, then canonicalize to JSON and hash.
/// Later files override earlier files (base → env → local overrides, …).
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Default::default());

    for p in paths {
        let s = fs::read_to_string(p).with_context(|| format!("read config: {p}"))?;
        let yaml_val: serde_yaml::Value =
            serde_yaml::from_str(&s).with_context(|| format!("parse yaml: {p}"))?;
        let json_val = serde_json::to_value(yaml_val).context("yaml->json conversion failed")?;
        deep_merge(&mut merged, json_val);
    }

    let canonical = canonicalize_json(&merged);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let hash = hex::encode(hasher.finalize());

    Ok(LoadedConfig {
        config_json: serde_json::from_str(&canonical).context("canonical json parse failed")?,
        canonical_json: canonical,
        config_hash: hash,
    })
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_json: Value,
    pub canonical_json: String,
    pub config_hash: String,
}

/// Deep-merge: objects merge recursively; arrays and scalars are replaced.
fn deep_merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (k, v) in src_map {
                match dst_map.get_mut(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        dst_map.insert(k, v);
                    }
                }
            }
        }
        (dst_slot, src_val) => {
            *dst_slot = src_val;
        }
    }
}

/// Canonicalize JSON by sorting all object keys recursively, compact output.
fn canonicalize_json(v: &Value) -> String {
    let sorted = sort_keys(v);
    serde_json::to_string(&sorted).expect("json serialization must not fail")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn later_file_overrides_earlier_scalar() {
        let base = write_tmp("top_n: 30\nstride_secs: 14400\n");
        let env = write_tmp("top_n: 50\n");
        let loaded = load_layered_yaml(&[
            base.path().to_str().unwrap(),
            env.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(loaded.config_json["top_n"], 50);
        assert_eq!(loaded.config_json["stride_secs"], 14400);
    }

    #[test]
    fn hash_is_stable_for_equivalent_merges() {
        let base = write_tmp("a: 1\nb: 2\n");
        let l1 = load_layered_yaml(&[base.path().to_str().unwrap()]).unwrap();
        let l2 = load_layered_yaml(&[base.path().to_str().unwrap()]).unwrap();
        assert_eq!(l1.config_hash, l2.config_hash);
    }

    #[test]
    fn hash_ignores_key_order() {
        let a = write_tmp("a: 1\nb: 2\n");
        let b = write_tmp("b: 2\na: 1\n");
        let la = load_layered_yaml(&[a.path().to_str().unwrap()]).unwrap();
        let lb = load_layered_yaml(&[b.path().to_str().unwrap()]).unwrap();
        assert_eq!(la.config_hash, lb.config_hash);
    }
}
