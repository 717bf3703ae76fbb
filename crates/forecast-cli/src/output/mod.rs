pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Row-shaped records inside a result, for tabular formats.
///
/// Daily series live under `points`; drilldowns are an array of months whose
/// `transactions` are flattened with the month label prepended.
pub fn rows_of(result: &Value) -> Option<Vec<Map<String, Value>>> {
    match result {
        Value::Array(items) if items.iter().all(|i| i.get("transactions").is_some()) => Some(
            items
                .iter()
                .flat_map(|month| {
                    let label = month.get("month").cloned().unwrap_or(Value::Null);
                    month["transactions"]
                        .as_array()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(move |tx| {
                            let mut row = Map::new();
                            row.insert("month".to_string(), label.clone());
                            row.extend(tx.as_object()?.clone());
                            Some(row)
                        })
                })
                .collect(),
        ),
        Value::Array(items) => Some(items.iter().filter_map(|i| i.as_object().cloned()).collect()),
        Value::Object(map) => map
            .get("points")
            .and_then(Value::as_array)
            .map(|pts| pts.iter().filter_map(|p| p.as_object().cloned()).collect()),
        _ => None,
    }
}
