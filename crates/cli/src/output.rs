//! Output formatting for CLI

use std::collections::BTreeSet;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::Value;

use amqpctl_common::Record;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Render a value for a table cell; strings without quotes
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Union of keys across records, in stable order
pub fn columns(records: &[Record]) -> Vec<String> {
    let mut keys: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        keys.extend(record.keys().map(String::as_str));
    }

    // keep identifying columns first
    let mut ordered: Vec<String> = ["id", "name", "type"]
        .into_iter()
        .filter(|key| keys.remove(key))
        .map(str::to_string)
        .collect();
    ordered.extend(keys.into_iter().map(str::to_string));
    ordered
}

/// Print a single record
pub fn print_record(record: &Record, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Field", "Value"]);
            for key in columns(std::slice::from_ref(record)) {
                table.add_row(vec![key.clone(), cell(&record[key.as_str()])]);
            }

            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(record).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for (key, value) in record {
                println!("{}: {}", key, cell(value));
            }
        }
    }
}

/// Print a list of records
pub fn print_records(records: &[Record], format: OutputFormat) {
    if records.is_empty() {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            let headers = columns(records);
            table.set_header(headers.clone());
            for record in records {
                table.add_row(
                    headers
                        .iter()
                        .map(|key| record.get(key).map(cell).unwrap_or_default())
                        .collect::<Vec<_>>(),
                );
            }

            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(records).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                for (key, value) in record {
                    println!("{}: {}", key, cell(value));
                }
            }
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("⚠️  {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    #[test]
    fn test_columns_put_identity_first() {
        let records = vec![
            record(json!({"value_threshold": 90, "type": "cpu", "id": "1001"})),
            record(json!({"enabled": true, "id": "1002"})),
        ];
        assert_eq!(columns(&records), vec!["id", "type", "enabled", "value_threshold"]);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&json!("rabbitmq_top")), "rabbitmq_top");
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!([1, 2])), "[1,2]");
        assert_eq!(cell(&json!(true)), "true");
    }
}
