use serde_json::Value;

/// Render a cell value as the text a user would see in the sheet.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    value.is_none_or(|v| cell_text(v).trim().is_empty())
}

/// First cell of a single-column row, if it holds anything.
pub(crate) fn first_filled(row: &[Value]) -> Option<String> {
    match row.first() {
        Some(cell) if !is_blank(Some(cell)) => Some(cell_text(cell)),
        _ => None,
    }
}
