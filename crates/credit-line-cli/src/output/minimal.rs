use serde_json::Value;

/// Result fields worth printing on their own, most important first.
const PRIORITY_KEYS: [&str; 4] = [
    "principal_and_interest_payment",
    "lowest_cost",
    "effective_apr",
    "total_payment",
];

/// Print just the key answer value from the output, falling back to the
/// first scalar field of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            match map.get(key) {
                Some(val) if !val.is_null() => return format_minimal(val),
                _ => {}
            }
        }
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array()) {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
