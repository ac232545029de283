use serde_json::Value;

use credit_line_core::config::CreditLineConfig;

/// Fill the fields a partial config leaves out from [`CreditLineConfig::default`].
///
/// Only top-level keys are merged. Keys the engine does not know are still
/// rejected when the merged value is deserialized.
pub fn config_with_defaults(
    partial: Value,
) -> Result<CreditLineConfig, Box<dyn std::error::Error>> {
    let Value::Object(fields) = partial else {
        return Err("config must be a JSON/YAML object".into());
    };
    let mut merged = serde_json::to_value(CreditLineConfig::default())?;
    if let Value::Object(ref mut base) = merged {
        base.extend(fields);
    }
    serde_json::from_value(merged).map_err(|e| format!("Invalid config: {}", e).into())
}

/// Apply caller defaults to every `scenarios[].config` of a comparison input.
pub fn scenarios_with_defaults(mut input: Value) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(scenarios) = input.get_mut("scenarios").and_then(Value::as_array_mut) {
        for scenario in scenarios {
            if let Some(config) = scenario.get_mut("config") {
                let filled = config_with_defaults(config.take())?;
                *config = serde_json::to_value(filled)?;
            }
        }
    }
    Ok(input)
}
