//! Plain-text rendering of result sets.
//!
//! Output is meant for humans and LLMs: newline-separated lines, tab-separated
//! fields, and fixed sentinel messages instead of empty strings.

use crate::db::{ResultSet, Row, Value};

/// Returned by `execute_query` when the statement produced no rows.
pub const NO_RESULTS: &str = "No results found.";

/// Message returned when `DESCRIBE` yields no columns.
pub fn no_schema_message(table_name: &str) -> String {
    format!("No schema found for table '{table_name}'")
}

/// One column of a table, as reported by `DESCRIBE`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDescriptor {
    pub name: Value,
    pub data_type: Value,
    pub nullable: Value,
    pub key: Value,
    pub default: Value,
    pub extra: Value,
}

impl ColumnDescriptor {
    /// Reads every column descriptor out of a `DESCRIBE` result.
    ///
    /// Fields are looked up by the server's column labels (`Field`, `Type`,
    /// `Null`, `Key`, `Default`, `Extra`); a missing label reads as None.
    pub fn from_describe(result: &ResultSet) -> Vec<Self> {
        let field = |row: &Row, label: &str| -> Value {
            result
                .column_index(label)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_default()
        };

        result
            .rows
            .iter()
            .map(|row| Self {
                name: field(row, "Field"),
                data_type: field(row, "Type"),
                nullable: field(row, "Null"),
                key: field(row, "Key"),
                default: field(row, "Default"),
                extra: field(row, "Extra"),
            })
            .collect()
    }
}

/// Renders the first column of every row, one per line.
pub fn name_list(result: &ResultSet) -> String {
    result
        .rows
        .iter()
        .filter_map(|row| row.first())
        .map(Value::to_display_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a result set as a tab-separated table with a header line.
///
/// Every line, including the last row, ends with a newline.
pub fn result_table(result: &ResultSet) -> String {
    if result.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut output = result.column_names().collect::<Vec<_>>().join("\t");
    output.push('\n');

    for row in &result.rows {
        let line = row
            .iter()
            .map(Value::to_display_string)
            .collect::<Vec<_>>()
            .join("\t");
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Renders table columns as labelled blocks separated by blank lines.
pub fn table_schema(table_name: &str, columns: &[ColumnDescriptor]) -> String {
    if columns.is_empty() {
        return no_schema_message(table_name);
    }

    let mut output = format!("Schema for table '{table_name}':\n");
    for column in columns {
        output.push_str(&format!("Column: {}\n", column.name));
        output.push_str(&format!("Type: {}\n", column.data_type));
        output.push_str(&format!("Null: {}\n", column.nullable));
        output.push_str(&format!("Key: {}\n", column.key));
        output.push_str(&format!("Default: {}\n", column.default));
        output.push_str(&format!("Extra: {}\n\n", column.extra));
    }

    output
}
