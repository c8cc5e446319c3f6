//! CSV encoding for admin exports.
//!
//! Rows come out of the repositories as JSON objects; every cell is
//! rendered as its JSON string representation with CSV quoting applied,
//! which keeps nested values and nulls unambiguous in spreadsheets.

use serde_json::Value;

/// Encodes a single CSV cell, quoting when needed.
#[must_use]
pub fn csv_cell(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn cell_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Renders JSON object rows as a CSV document.
///
/// Headers are the keys of the first row; rows missing a key render an
/// empty cell. An empty input produces an empty document.
#[must_use]
pub fn csv_document(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| csv_cell(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let line = headers
            .iter()
            .map(|h| csv_cell(&cell_value(row.get(h.as_str()))))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_cells_are_unquoted() {
        assert_eq!(csv_cell("Abidjan"), "Abidjan");
    }

    #[test]
    fn cells_with_commas_and_quotes_are_escaped() {
        assert_eq!(csv_cell("Cocody, Abidjan"), "\"Cocody, Abidjan\"");
        assert_eq!(csv_cell("dit \"le lot\""), "\"dit \"\"le lot\"\"\"");
    }

    #[test]
    fn document_uses_first_row_headers() {
        let rows = vec![
            json!({"price": 2_500_000, "slug": "lot-12"}),
            json!({"slug": "lot-13", "price": null}),
        ];
        let doc = csv_document(&rows);
        let mut lines = doc.lines();
        assert_eq!(lines.next(), Some("price,slug"));
        assert_eq!(lines.next(), Some("2500000,lot-12"));
        assert_eq!(lines.next(), Some(",lot-13"));
    }

    #[test]
    fn rows_missing_a_header_render_empty_cells() {
        let rows = vec![
            json!({"name": "Awa", "notes": "relance"}),
            json!({"name": "Ben"}),
        ];
        let doc = csv_document(&rows);
        let mut lines = doc.lines();
        assert_eq!(lines.next(), Some("name,notes"));
        assert_eq!(lines.next(), Some("Awa,relance"));
        assert_eq!(lines.next(), Some("Ben,"));
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert_eq!(csv_document(&[]), "");
    }
}
