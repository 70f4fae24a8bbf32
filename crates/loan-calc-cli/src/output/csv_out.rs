use serde_json::{Map, Value};
use std::io;

use super::{result_object, scalar_text, schedule_rows, SCHEDULE_COLUMNS};

/// Write output as CSV to stdout: schedule rows when the result has a
/// schedule, otherwise a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let Some(result) = result_object(value) else {
        let _ = wtr.write_record([scalar_text(Some(value)).unwrap_or_default()]);
        return;
    };

    if let Some(rows) = schedule_rows(result) {
        let _ = wtr.write_record(SCHEDULE_COLUMNS);
        for row in rows {
            let empty = Map::new();
            let map = row.as_object().unwrap_or(&empty);
            let record: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|c| scalar_text(map.get(*c)).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
        return;
    }

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in result {
        let _ = wtr.write_record([key.clone(), scalar_text(Some(val)).unwrap_or_default()]);
    }
}
