use serde::Serialize;
use serde_json::Value;

/// Serialize CLI overrides and drop every unset (`null`) entry so absent
/// flags never mask values from config files or the environment.
pub fn skip_unset<T: Serialize>(input: T) -> Value {
    let mut value = serde_json::to_value(input).unwrap_or(Value::Null);
    skip_unset_recursive(&mut value);
    value
}

fn skip_unset_recursive(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        for v in map.values_mut() {
            skip_unset_recursive(v);
        }
    }
}
