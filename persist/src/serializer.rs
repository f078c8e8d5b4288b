//! Slice serialization

use serde::Serialize;
use serde_json::Value;
use statevault_core::{VaultError, VaultResult};
use tracing::warn;

/// Encodes slices to their storable form and back.
///
/// The default mode stores each slice as a JSON string. A disabled
/// serializer passes structured values through unchanged, for backends that
/// store them natively.
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    enabled: bool,
    production: bool,
}

impl Serializer {
    pub fn new(enabled: bool, production: bool) -> Self {
        Self {
            enabled,
            production,
        }
    }

    /// Encode any serializable value to its string form.
    ///
    /// A value that cannot be serialized (cyclic or otherwise hostile) is a
    /// hard [`VaultError::CyclicState`] in production; outside production it
    /// is replaced with the encoded `null` and a diagnostic is logged.
    pub fn encode<T: Serialize>(&self, key: &str, value: &T) -> VaultResult<String> {
        match serde_json::to_string(value) {
            Ok(encoded) => Ok(encoded),
            Err(e) if self.production => Err(VaultError::CyclicState {
                key: key.to_string(),
                detail: e.to_string(),
            }),
            Err(e) => {
                warn!(
                    "cannot serialize state at key \"{}\", substituting null: {}",
                    key, e
                );
                Ok("null".to_string())
            }
        }
    }

    /// Encode a slice for storage, honoring the pass-through mode.
    pub fn encode_value(&self, key: &str, value: Value) -> VaultResult<Value> {
        if !self.enabled {
            return Ok(value);
        }
        self.encode(key, &value).map(Value::String)
    }

    /// Decode a stored slice back into a structured value.
    pub fn decode_value(&self, key: &str, stored: &Value) -> VaultResult<Value> {
        if !self.enabled {
            return Ok(stored.clone());
        }
        let encoded = stored.as_str().ok_or_else(|| VaultError::RehydrationDecode {
            key: key.to_string(),
            detail: "expected a serialized string".to_string(),
        })?;
        serde_json::from_str(encoded).map_err(|e| VaultError::RehydrationDecode {
            key: key.to_string(),
            detail: e.to_string(),
        })
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(true, !cfg!(debug_assertions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    /// A value whose Serialize impl always fails, standing in for state that
    /// JSON cannot represent.
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cyclical state"))
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let serializer = Serializer::new(true, false);
        let stored = serializer
            .encode_value("settings", json!({"theme": "dark"}))
            .unwrap();
        assert!(matches!(stored, Value::String(_)));

        let decoded = serializer.decode_value("settings", &stored).unwrap();
        assert_eq!(decoded, json!({"theme": "dark"}));
    }

    #[test]
    fn test_disabled_serializer_passes_through() {
        let serializer = Serializer::new(false, false);
        let stored = serializer
            .encode_value("settings", json!({"theme": "dark"}))
            .unwrap();
        assert_eq!(stored, json!({"theme": "dark"}));
        assert_eq!(
            serializer.decode_value("settings", &stored).unwrap(),
            json!({"theme": "dark"})
        );
    }

    #[test]
    fn test_unserializable_substituted_outside_production() {
        let serializer = Serializer::new(true, false);
        let encoded = serializer.encode("settings", &Unserializable).unwrap();
        assert_eq!(encoded, "null");
    }

    #[test]
    fn test_unserializable_is_hard_error_in_production() {
        let serializer = Serializer::new(true, true);
        let err = serializer.encode("settings", &Unserializable).unwrap_err();
        assert!(matches!(err, VaultError::CyclicState { key, .. } if key == "settings"));
    }

    #[test]
    fn test_decode_bad_json_is_per_key_error() {
        let serializer = Serializer::new(true, false);
        let err = serializer
            .decode_value("settings", &json!("<bad-json>"))
            .unwrap_err();
        assert!(matches!(err, VaultError::RehydrationDecode { key, .. } if key == "settings"));
    }

    #[test]
    fn test_decode_rejects_non_string() {
        let serializer = Serializer::new(true, false);
        let err = serializer.decode_value("settings", &json!(42)).unwrap_err();
        assert!(matches!(err, VaultError::RehydrationDecode { .. }));
    }
}
