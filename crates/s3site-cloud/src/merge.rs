//! Deep merge of nested configuration mappings

use serde_json::Value;

/// Merge `overrides` onto `base`
///
/// - mapping + mapping: key by key, recursively. Keys only in `base` are kept.
/// - sequence + sequence: element by element over the shared length (two
///   mappings merge recursively, anything else takes the override element),
///   then the remaining elements of the longer side are appended.
/// - any other combination: the override wins.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, override_value) in override_map {
                let value = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, override_value),
                    None => override_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (Value::Array(base_items), Value::Array(override_items)) => {
            let shared = base_items.len().min(override_items.len());
            let mut merged: Vec<Value> = base_items
                .iter()
                .zip(override_items)
                .map(|(b, o)| match (b, o) {
                    (Value::Object(_), Value::Object(_)) => deep_merge(b, o),
                    _ => o.clone(),
                })
                .collect();

            let longer = if base_items.len() > override_items.len() {
                base_items
            } else {
                override_items
            };
            merged.extend(longer.iter().skip(shared).cloned());
            Value::Array(merged)
        }
        _ => overrides.clone(),
    }
}

/// Recompute `quantity` of every mapping that also holds an `items` sequence
pub fn sync_quantities(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let count = map.get("items").and_then(Value::as_array).map(Vec::len);
            if let Some(count) = count {
                if map.contains_key("quantity") {
                    map.insert("quantity".to_string(), Value::from(count));
                }
            }
            for child in map.values_mut() {
                sync_quantities(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sync_quantities),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disjoint_keys_are_unioned() {
        let base = json!({ "a": { "x": 1 } });
        let overrides = json!({ "a": { "y": 2 } });
        assert_eq!(deep_merge(&base, &overrides), json!({ "a": { "x": 1, "y": 2 } }));
    }

    #[test]
    fn test_scalar_conflict_takes_override() {
        let base = json!({ "min_ttl": 86400, "enabled": true });
        let overrides = json!({ "min_ttl": 900 });
        assert_eq!(
            deep_merge(&base, &overrides),
            json!({ "min_ttl": 900, "enabled": true })
        );
    }

    #[test]
    fn test_scalar_vs_mapping_takes_override() {
        let base = json!({ "logging": { "enabled": false } });
        let overrides = json!({ "logging": "off" });
        assert_eq!(deep_merge(&base, &overrides), json!({ "logging": "off" }));

        let base = json!({ "aliases": 0 });
        let overrides = json!({ "aliases": { "quantity": 1 } });
        assert_eq!(
            deep_merge(&base, &overrides),
            json!({ "aliases": { "quantity": 1 } })
        );
    }

    #[test]
    fn test_sequence_elements_merge_pairwise() {
        let base = json!([{ "a": 1 }, { "b": 2 }]);
        let overrides = json!([{ "c": 3 }]);
        assert_eq!(
            deep_merge(&base, &overrides),
            json!([{ "a": 1, "c": 3 }, { "b": 2 }])
        );
    }

    #[test]
    fn test_sequence_override_extras_are_appended() {
        let base = json!([{ "a": 1 }]);
        let overrides = json!([{ "b": 2 }, { "c": 3 }]);
        assert_eq!(
            deep_merge(&base, &overrides),
            json!([{ "a": 1, "b": 2 }, { "c": 3 }])
        );
    }

    #[test]
    fn test_sequence_non_mapping_elements_take_override() {
        let base = json!(["x", { "a": 1 }]);
        let overrides = json!([{ "b": 2 }, "y"]);
        assert_eq!(deep_merge(&base, &overrides), json!([{ "b": 2 }, "y"]));
    }

    #[test]
    fn test_nested_origin_override() {
        let base = json!({
            "origins": {
                "quantity": 1,
                "items": [{
                    "id": "site-S3-origin",
                    "custom_origin_config": { "http_port": 80, "origin_protocol_policy": "http-only" }
                }]
            }
        });
        let overrides = json!({
            "origins": { "items": [{ "custom_origin_config": { "http_port": 8080 } }] }
        });

        let merged = deep_merge(&base, &overrides);
        assert_eq!(merged["origins"]["items"][0]["id"], "site-S3-origin");
        assert_eq!(
            merged["origins"]["items"][0]["custom_origin_config"],
            json!({ "http_port": 8080, "origin_protocol_policy": "http-only" })
        );
        assert_eq!(merged["origins"]["quantity"], 1);
    }

    #[test]
    fn test_sync_quantities() {
        let mut value = json!({
            "aliases": { "quantity": 0, "items": ["www.example.com", "example.com"] },
            "cache_behaviors": { "quantity": 0 },
            "origins": { "items": [{ "id": "o" }] },
            "nested": [{ "headers": { "quantity": 5, "items": [] } }]
        });

        sync_quantities(&mut value);

        assert_eq!(value["aliases"]["quantity"], 2);
        assert_eq!(value["cache_behaviors"]["quantity"], 0);
        assert!(value["origins"].get("quantity").is_none());
        assert_eq!(value["nested"][0]["headers"]["quantity"], 0);
    }
}
