pub mod validation;

pub use validation::{ErrorCode, ValidationRequest, ValidationResult};

/// One spreadsheet row as returned by the Sheets API, leftmost cell first.
pub type RowValues = Vec<serde_json::Value>;
