use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{result_of, rows_of};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in a Field/Value table; row-shaped data (daily
/// points, drilldown transactions) gets its own table underneath.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        print_scalar_fields(map);
    }
    if let Some(rows) = rows_of(result) {
        print_rows(&rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_scalar_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                builder.push_record([key.as_str(), &format!("({} rows)", items.len())]);
            }
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    let label = format!("{}.{}", key, inner_key);
                    builder.push_record([label.as_str(), &format_value(inner_val)]);
                }
            }
            _ => builder.push_record([key.as_str(), &format_value(val)]),
        }
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Map<String, Value>]) {
    let Some(first) = rows.first() else {
        println!("(no rows)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }
    println!("\n{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
