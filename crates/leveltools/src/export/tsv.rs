//! Tab-separated export of flat JSON records, for pasting into spreadsheets.

use serde_json::{Map, Value};

/// Build a TSV table from records.
///
/// The header row lists keys in first-seen order across all records. Each
/// record becomes one row with its values under their header; absent keys are
/// left empty. Strings are written as-is, `null` as an empty cell, anything
/// else in its JSON form.
pub fn records_to_tsv(records: &[Map<String, Value>]) -> String {
    let mut headers: Vec<&str> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len());

    for record in records {
        let mut row: Vec<String> = Vec::new();
        for (key, value) in record {
            let column = match headers.iter().position(|h| *h == key.as_str()) {
                Some(column) => column,
                None => {
                    headers.push(key.as_str());
                    headers.len() - 1
                }
            };
            if row.len() <= column {
                row.resize(column + 1, String::new());
            }
            row[column] = cell(value);
        }
        rows.push(row);
    }

    let mut output = headers.join("\t");
    for mut row in rows {
        row.resize(headers.len(), String::new());
        output.push('\n');
        output.push_str(&row.join("\t"));
    }
    output
}

/// Parse a JSON array of objects and export it with [`records_to_tsv`].
pub fn json_to_tsv(json: &str) -> Result<String, serde_json::Error> {
    let records: Vec<Map<String, Value>> = serde_json::from_str(json)?;
    Ok(records_to_tsv(&records))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
