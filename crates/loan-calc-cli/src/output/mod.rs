pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Column order for schedule rows; opening and balloon rows leave some blank.
pub const SCHEDULE_COLUMNS: [&str; 7] = [
    "kind",
    "month",
    "payment_date",
    "payment",
    "interest",
    "principal",
    "balance",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The `result` object of a computation envelope, if present.
pub fn result_object(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    value.get("result").and_then(Value::as_object)
}

/// Schedule rows of an amortization result.
pub fn schedule_rows(result: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    result.get("schedule").and_then(Value::as_array)
}

/// Render a scalar for a cell; `None` for missing and null values.
pub fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(serde_json::to_string(other).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_rows_found_in_result() {
        let v = json!({"result": {"schedule": [{"kind": "opening", "balance": "100"}]}});
        let result = result_object(&v).unwrap();
        assert_eq!(schedule_rows(result).unwrap().len(), 1);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(Some(&json!("1.50"))), Some("1.50".to_string()));
        assert_eq!(scalar_text(Some(&json!(60))), Some("60".to_string()));
        assert_eq!(scalar_text(Some(&Value::Null)), None);
        assert_eq!(scalar_text(None), None);
    }
}
