use serde_json::Value;

use super::result_of;

/// Print just the headline value of the output.
///
/// Looks for the field a dashboard card would show for each command, in
/// priority order, then falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    let priority_paths: [&[&str]; 6] = [
        &["runway_days"],
        &["risk_count"],
        &["summary", "percent_change"],
        &["kpis", "runway_days"],
        &["risk", "risk_count"],
        &["transaction_count"],
    ];

    for path in priority_paths {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    match result_obj {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        Value::Array(items) => println!("{} records", items.len()),
        other => println!("{}", format_minimal(other)),
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
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
