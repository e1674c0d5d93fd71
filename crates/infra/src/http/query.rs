//! Query-string flattening for nested parameters
//!
//! Produces the same pairs as PHP's `http_build_query`, which is what the
//! EagleView endpoints expect: nested arrays and objects use bracket keys,
//! booleans become `1`/`0` and `null` values are left out.

use serde_json::{Map, Value};

/// Flatten a parameter map into ordered key/value pairs
pub fn flatten_query(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_pairs(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_pairs(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push((prefix, if *flag { "1" } else { "0" }.to_string())),
        Value::Number(number) => out.push((prefix, number.to_string())),
        Value::String(text) => out.push((prefix, text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_pairs(format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                push_pairs(format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}
