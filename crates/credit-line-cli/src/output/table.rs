use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::csv_out::{format_money, SCHEDULE_FIELDS, SCHEDULE_HEADERS};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in a Field/Value table; each array of records in
/// the result (schedule, summaries, deltas) gets its own table below it.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_tables(result, map),
            _ => print_flat_object(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let scalars: Map<String, Value> = result
        .iter()
        .filter(|(_, v)| !v.is_array())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    print_flat_object(&scalars);

    for (key, val) in result {
        let Value::Array(rows) = val else { continue };
        println!("\n{}:", key);
        if key == "schedule" {
            print_schedule_table(rows);
        } else {
            print_array_table(rows);
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_schedule_table(rows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_HEADERS);
    for row in rows {
        let period = row.get("period").map(format_value).unwrap_or_default();
        let mut record = vec![period];
        for field in SCHEDULE_FIELDS {
            record.push(row.get(field).map(format_money).unwrap_or_default());
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            let row: Vec<String> = headers
                .iter()
                .map(|h| item.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
