mod accessor;
mod auth;
mod cells;
mod client;
mod requests;

pub use accessor::SheetAccessor;
pub use client::SheetsClient;

// Re-export clear_tokens for CLI usage
pub use auth::clear_tokens as clear_sheets_tokens;

use crate::error::Result;
use crate::models::{RowValues, ValidationRequest, ValidationResult};
use async_trait::async_trait;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, BatchUpdateValuesRequest, Spreadsheet, ValueRange,
};

/// Raw Google Sheets calls, one round trip each.
///
/// Errors are returned as the API reported them so callers can classify them.
#[async_trait]
pub trait SheetsBackend {
    async fn get_sheet_properties(
        &self,
        spreadsheet_id: &str,
        fields: &str,
    ) -> google_sheets4::Result<Spreadsheet>;

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> google_sheets4::Result<ValueRange>;

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateSpreadsheetRequest,
    ) -> google_sheets4::Result<()>;

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> google_sheets4::Result<()>;
}

/// Row and column level access to a budget spreadsheet.
///
/// Rows are 1-based, as displayed in the Sheets UI.
#[async_trait]
pub trait SheetOperations {
    async fn sheet_id(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<i32>;

    async fn first_blank_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<i32>;

    async fn last_filled_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<i32>;

    async fn insert_row(&self, spreadsheet_id: &str, sheet_id: i32, row_index: i32) -> Result<()>;

    async fn delete_row(&self, spreadsheet_id: &str, sheet_id: i32, row_index: i32) -> Result<()>;

    async fn read_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row_index: i32,
    ) -> Result<Option<RowValues>>;

    async fn read_column(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<Vec<String>>;

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> Result<()>;

    async fn validate_spreadsheet(&self, request: &ValidationRequest) -> Result<ValidationResult>;
}
