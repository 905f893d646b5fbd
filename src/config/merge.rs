//! Field-by-field merging of configuration layers.

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// Objects merge recursively. Anything else in the overlay replaces the base
/// value, except `null`, which means "not specified" and keeps the base.
///
/// ```
/// use serde_json::json;
/// use taskpad::config::deep_merge;
///
/// let base = json!({ "server": { "port": 3000, "bind": "127.0.0.1" } });
/// let overlay = json!({ "server": { "port": 8080 } });
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({ "server": { "port": 8080, "bind": "127.0.0.1" } })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold [`deep_merge`] over the layers, later layers winning.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_sections_merge_per_field() {
        let base = json!({
            "server": {"bind": "127.0.0.1", "port": 3000},
            "tasks": {"due_soon_days": 3}
        });
        let overlay = json!({"server": {"port": 9000}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "server": {"bind": "127.0.0.1", "port": 9000},
                "tasks": {"due_soon_days": 3}
            })
        );
    }

    #[test]
    fn null_keeps_base() {
        let base = json!({"auth": {"cookie_secure": true}});
        let overlay = json!({"auth": {"cookie_secure": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
        assert_eq!(deep_merge(json!({"a": 1}), Value::Null), json!({"a": 1}));
    }

    #[test]
    fn scalars_and_arrays_replace() {
        assert_eq!(
            deep_merge(json!({"v": [1, 2, 3]}), json!({"v": [4]})),
            json!({"v": [4]})
        );
        assert_eq!(
            deep_merge(json!({"v": {"nested": true}}), json!({"v": 42})),
            json!({"v": 42})
        );
    }

    #[test]
    fn merge_all_later_layers_win() {
        let merged = deep_merge_all([json!({"a": 1}), json!({"b": 2}), json!({"a": 3})]);
        assert_eq!(merged, json!({"a": 3, "b": 2}));
    }
}
