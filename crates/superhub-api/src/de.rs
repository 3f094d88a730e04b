//! Serde helpers shared by the resource models.

use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as a missing field: as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "null_as_default")]
        values: HashMap<String, String>,
    }

    #[test]
    fn null_missing_and_present() {
        let null: Wrapper = serde_json::from_value(json!({ "values": null })).unwrap();
        assert!(null.values.is_empty());

        let missing: Wrapper = serde_json::from_value(json!({})).unwrap();
        assert!(missing.values.is_empty());

        let present: Wrapper = serde_json::from_value(json!({ "values": { "a": "b" } })).unwrap();
        assert_eq!(present.values.get("a").map(String::as_str), Some("b"));

        assert!(serde_json::from_value::<Wrapper>(json!({ "values": 5 })).is_err());
    }
}
