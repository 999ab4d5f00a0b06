//! Deterministic state hashing
//!
//! Hashes the canonical JSON form of any serializable match state with
//! presentation-only fields removed. Used to spot where two runs diverge.

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fields that never influence play
const EXCLUDED_FIELDS: &[&str] = &["logger", "output_mode", "verbosity"];

/// Compute a deterministic hash of a match state
///
/// Two states that agree on everything gameplay-relevant hash equal.
/// Returns 0 if the state cannot be serialized.
pub fn compute_state_hash<T: Serialize + ?Sized>(state: &T) -> u64 {
    let json_value = match serde_json::to_value(state) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Warning: Failed to serialize state for hashing: {}", e);
            return 0;
        }
    };

    let canonical = strip_metadata(json_value).to_string();

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Recursively strip excluded fields from a JSON value
fn strip_metadata(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
                .map(|(key, v)| (key, strip_metadata(v)))
                .collect(),
        ),
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(strip_metadata).collect())
        }
        other => other,
    }
}

/// Format a hash for display (first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_metadata() {
        let json = serde_json::json!({
            "turn": 5,
            "logger": {"verbosity": "Normal"},
            "players": [{"score": 20, "charge": 3}]
        });

        assert_eq!(
            strip_metadata(json),
            serde_json::json!({
                "turn": 5,
                "players": [{"score": 20, "charge": 3}]
            })
        );
    }

    #[test]
    fn test_logger_settings_do_not_change_hash() {
        let a = serde_json::json!({"turn": 5, "logger": {"verbosity": "Silent"}});
        let b = serde_json::json!({"turn": 5, "logger": {"verbosity": "Verbose"}});
        assert_eq!(compute_state_hash(&a), compute_state_hash(&b));

        let c = serde_json::json!({"turn": 6, "logger": {"verbosity": "Silent"}});
        assert_ne!(compute_state_hash(&a), compute_state_hash(&c));
    }

    #[test]
    fn test_format_hash() {
        assert_eq!(format_hash(0xdeadbeef_00000000), "deadbeef");
        assert_eq!(format_hash(0x1), "00000000");
    }
}
