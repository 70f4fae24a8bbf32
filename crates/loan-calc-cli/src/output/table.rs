use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{result_object, scalar_text, schedule_rows, SCHEDULE_COLUMNS};

/// Format output as tables: the result summary, then the schedule if any.
pub fn print_table(value: &Value) {
    let Some(result) = result_object(value) else {
        println!("{}", value);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if key == "schedule" {
            continue;
        }
        builder.push_record([key.clone(), format_value(val)]);
    }
    println!("{}", builder.build());

    if let Some(rows) = schedule_rows(result) {
        println!("\nSchedule:");
        println!("{}", schedule_table(rows));
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn schedule_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS);
    for row in rows {
        let empty = Map::new();
        let map = row.as_object().unwrap_or(&empty);
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|c| scalar_text(map.get(*c)).unwrap_or_else(|| "-".to_string())),
        );
    }
    builder.build()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar_text(Some(other)).unwrap_or_else(|| "null".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_table_fills_missing_cells() {
        let rows = vec![
            json!({"kind": "opening", "balance": "1000.00"}),
            json!({"kind": "regular", "month": 1, "payment": "510.00", "interest": "10.00",
                   "principal": "500.00", "balance": "500.00"}),
        ];
        let rendered = schedule_table(&rows).to_string();
        assert!(rendered.contains("opening"));
        assert!(rendered.contains("510.00"));
        assert!(rendered.contains('-'));
    }
}
