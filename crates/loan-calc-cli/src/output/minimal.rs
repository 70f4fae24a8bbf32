use serde_json::Value;

use super::scalar_text;

/// Headline fields, in priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "annual_rate",
    "max_loan_amount",
    "monthly_payment",
    "purchase_price",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(text) = scalar_text(map.get(*key)) {
                return text;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(Some(val)).unwrap_or_default());
        }
    }

    scalar_text(Some(result_obj)).unwrap_or_else(|| "null".to_string())
}
