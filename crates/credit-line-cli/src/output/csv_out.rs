use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::io;

/// Column headers of an exported schedule.
pub const SCHEDULE_HEADERS: [&str; 9] = [
    "Period",
    "Beginning Balance",
    "Draw",
    "Total Payment",
    "Principal",
    "Interest",
    "Fees",
    "Ending Balance",
    "Available Credit",
];

/// Period record fields behind every header after "Period".
pub const SCHEDULE_FIELDS: [&str; 8] = [
    "beginning_balance",
    "draw_amount",
    "payment",
    "principal",
    "interest",
    "fees",
    "ending_balance",
    "available_credit",
];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV output error: {}", e);
    }
    let _ = wtr.flush();
}

/// Schedules use the fixed export layout; anything else is written as
/// field/value rows, or one row per element for arrays of records.
pub fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let result = value.get("result").unwrap_or(value);

    if let Some(Value::Array(schedule)) = result.get("schedule") {
        return write_schedule(wtr, schedule);
    }
    if let Some(Value::Array(summaries)) = result.get("summaries") {
        return write_array_csv(wtr, summaries);
    }

    match result {
        Value::Object(map) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in map {
                wtr.write_record([key.as_str(), &format_csv_value(val)])?;
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr)?,
        _ => wtr.write_record([&format_csv_value(result)])?,
    }
    Ok(())
}

fn write_schedule<W: io::Write>(wtr: &mut csv::Writer<W>, schedule: &[Value]) -> csv::Result<()> {
    wtr.write_record(SCHEDULE_HEADERS)?;
    for entry in schedule {
        let mut row = Vec::with_capacity(SCHEDULE_HEADERS.len());
        row.push(entry.get("period").map(format_csv_value).unwrap_or_default());
        for field in SCHEDULE_FIELDS {
            row.push(entry.get(field).map(format_money).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

/// Two decimal places, halves rounded away from zero.
pub fn format_money(value: &Value) -> String {
    let parsed = match value {
        Value::String(s) => s.parse::<Decimal>().ok(),
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    };
    match parsed {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.2}", rounded)
        }
        None => format_csv_value(value),
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_line_core::amortization::compute_schedule;
    use credit_line_core::config::CreditLineConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(&json!("406.25")), "406.25");
        assert_eq!(format_money(&json!("50000")), "50000.00");
        assert_eq!(format_money(&json!("0.125")), "0.13");
        assert_eq!(format_money(&json!("-0.125")), "-0.13");
        assert_eq!(format_money(&json!(1056.2121)), "1056.21");
    }

    #[test]
    fn test_schedule_export_layout() {
        let config = CreditLineConfig {
            draw_schedule: vec![dec!(50000)],
            ..CreditLineConfig::default()
        };
        let result = compute_schedule(&config);
        let value = json!({ "result": serde_json::to_value(&result).unwrap() });
        let out = render(&value);
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Period,Beginning Balance,Draw,Total Payment,Principal,Interest,Fees,Ending Balance,Available Credit"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,0.00,50000.00,406.25,0.00,406.25,0.00,50000.00,50000.00"
        );
        assert_eq!(out.lines().count(), 1 + 84);
    }

    #[test]
    fn test_flat_object_as_field_value() {
        let out = render(&json!({ "result": { "lowest_cost": "a" } }));
        assert_eq!(out, "field,value\nlowest_cost,a\n");
    }
}
