//! Identifier keys.
//!
//! Record ids and edge targets may be any JSON value. They are compared
//! through their canonical text: strings verbatim, everything else through
//! compact JSON, and an absent field as `undefined`. So `2` and `"2"` name the
//! same record, and every record without an `id` shares one key. Floats with
//! no fractional part are written as integers, so `1.0` is keyed as `1`.

use std::borrow::Borrow;
use std::fmt;

use serde_json::Value;

/// Key used for a missing `id` or `targetid` field.
pub const UNDEFINED_KEY: &str = "undefined";

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_FLOAT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Canonical key under which record ids and edge targets are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdKey(String);

impl IdKey {
    /// Build the key for an optional id value.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => Self(UNDEFINED_KEY.to_string()),
            Some(Value::String(text)) => Self(text.clone()),
            Some(Value::Number(number)) => Self(number_key(number)),
            Some(other) => Self(other.to_string()),
        }
    }

    pub fn undefined() -> Self {
        Self(UNDEFINED_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED_KEY
    }
}

fn number_key(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() < EXACT_FLOAT_LIMIT =>
        {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for IdKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_strings_share_keys() {
        assert_eq!(IdKey::from_value(Some(&json!(2))), IdKey::from_value(Some(&json!("2"))));
        assert_eq!(IdKey::from_value(Some(&json!(1.5))).as_str(), "1.5");
    }

    #[test]
    fn whole_floats_key_as_integers() {
        assert_eq!(IdKey::from_value(Some(&json!(1.0))).as_str(), "1");
        assert_eq!(IdKey::from_value(Some(&json!(-0.0))).as_str(), "0");
        assert_eq!(IdKey::from_value(Some(&json!(1.0))), IdKey::from_value(Some(&json!("1"))));
        assert_eq!(IdKey::from_value(Some(&json!(1e300))).as_str(), "1e300");
        assert_eq!(IdKey::from_value(Some(&json!(u64::MAX))).as_str(), "18446744073709551615");
    }

    #[test]
    fn absent_ids_are_undefined() {
        let key = IdKey::from_value(None);
        assert!(key.is_undefined());
        assert_eq!(key, IdKey::undefined());
        assert_ne!(IdKey::from_value(Some(&Value::Null)), key);
        assert_eq!(IdKey::from_value(Some(&Value::Null)).as_str(), "null");
    }

    #[test]
    fn structured_ids_use_compact_json() {
        let key = IdKey::from_value(Some(&json!({"a": [1, true]})));
        assert_eq!(key.as_str(), r#"{"a":[1,true]}"#);
    }
}
