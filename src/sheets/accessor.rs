use super::cells::{first_filled, is_blank};
use super::requests::{
    SHEET_PROPERTIES_FIELDS, column_range, delete_row_request, insert_row_request, row_range,
};
use super::{SheetOperations, SheetsBackend};
use crate::error::{AppError, Result, api_message, api_status};
use crate::models::{RowValues, ValidationRequest, ValidationResult};
use async_trait::async_trait;
use google_sheets4::api::{BatchUpdateValuesRequest, Spreadsheet};
use tracing::{debug, error, info, instrument};

const FORBIDDEN: u16 = 403;
const NOT_FOUND: u16 = 404;

/// Spreadsheet access for the budget workflow over any [`SheetsBackend`].
///
/// Holds no state of its own: every operation is a single request to the
/// backend, so concurrent callers editing the same sheet can race.
pub struct SheetAccessor<B> {
    backend: B,
    required_sheet: String,
}

impl<B> SheetAccessor<B>
where
    B: SheetsBackend + Sync,
{
    /// `required_sheet` is the sheet a spreadsheet must contain to pass validation.
    pub fn new(backend: B, required_sheet: impl Into<String>) -> Self {
        Self {
            backend,
            required_sheet: required_sheet.into(),
        }
    }

    /// Fetch sheet titles and ids. A missing spreadsheet yields `None`.
    async fn fetch_sheet_properties(&self, spreadsheet_id: &str) -> Result<Option<Spreadsheet>> {
        match self
            .backend
            .get_sheet_properties(spreadsheet_id, SHEET_PROPERTIES_FIELDS)
            .await
        {
            Ok(spreadsheet) => Ok(Some(spreadsheet)),
            Err(e) => match api_status(&e) {
                Some(FORBIDDEN) => Err(AppError::Unauthorized(api_message(&e))),
                Some(NOT_FOUND) => Ok(None),
                _ => Err(e.into()),
            },
        }
    }

    async fn column_values(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<Option<Vec<RowValues>>> {
        let range = column_range(sheet_name, column, start_row);
        let response = self.backend.get_values(spreadsheet_id, &range).await?;
        debug!(range = %range, rows = ?response.values.as_ref().map(Vec::len), "Read column");
        Ok(response.values)
    }
}

#[async_trait]
impl<B> SheetOperations for SheetAccessor<B>
where
    B: SheetsBackend + Sync,
{
    #[instrument(name = "Resolving sheet id", skip(self))]
    async fn sheet_id(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<i32> {
        let sheets = self
            .fetch_sheet_properties(spreadsheet_id)
            .await?
            .and_then(|spreadsheet| spreadsheet.sheets)
            .unwrap_or_default();

        if sheets.is_empty() {
            return Err(AppError::SpreadsheetNotFound(format!(
                "Spreadsheet id '{}' not found.",
                spreadsheet_id
            )));
        }

        let sheet_id = sheets
            .iter()
            .filter_map(|sheet| sheet.properties.as_ref())
            .find(|props| props.title.as_deref() == Some(sheet_name))
            .and_then(|props| props.sheet_id);

        // Zero is rejected along with a missing id, even though the first sheet of
        // a spreadsheet usually has id 0.
        match sheet_id {
            Some(id) if id != 0 => {
                debug!(sheet_id = id, "Found sheet");
                Ok(id)
            }
            _ => Err(AppError::SheetNotFound(format!(
                "Sheet '{}' not found in Spreadsheet id '{}'.",
                sheet_name, spreadsheet_id
            ))),
        }
    }

    #[instrument(name = "Finding first blank row", skip(self))]
    async fn first_blank_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<i32> {
        let Some(rows) = self
            .column_values(spreadsheet_id, sheet_name, column, start_row)
            .await?
        else {
            return Ok(start_row);
        };

        let offset = rows
            .iter()
            .position(|row| is_blank(row.first()))
            .unwrap_or(rows.len());

        Ok(start_row + offset as i32)
    }

    #[instrument(name = "Finding last filled row", skip(self))]
    async fn last_filled_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<i32> {
        let last_row = self
            .first_blank_row(spreadsheet_id, sheet_name, column, start_row)
            .await?
            - 1;

        if last_row < start_row {
            info!(column, sheet_name, "No item found in column");
            return Err(AppError::NoItemFound(format!(
                "No item found in column '{}' of sheet '{}'.",
                column, sheet_name
            )));
        }

        Ok(last_row)
    }

    #[instrument(name = "Inserting row", skip(self))]
    async fn insert_row(&self, spreadsheet_id: &str, sheet_id: i32, row_index: i32) -> Result<()> {
        self.backend
            .batch_update(spreadsheet_id, insert_row_request(sheet_id, row_index))
            .await?;
        Ok(())
    }

    #[instrument(name = "Deleting row", skip(self))]
    async fn delete_row(&self, spreadsheet_id: &str, sheet_id: i32, row_index: i32) -> Result<()> {
        self.backend
            .batch_update(spreadsheet_id, delete_row_request(sheet_id, row_index))
            .await?;
        Ok(())
    }

    #[instrument(name = "Reading row", skip(self))]
    async fn read_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row_index: i32,
    ) -> Result<Option<RowValues>> {
        let range = row_range(sheet_name, row_index);
        let response = self.backend.get_values(spreadsheet_id, &range).await?;

        Ok(response.values.and_then(|rows| rows.into_iter().next()))
    }

    #[instrument(name = "Reading column", skip(self))]
    async fn read_column(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        column: &str,
        start_row: i32,
    ) -> Result<Vec<String>> {
        let rows = self
            .column_values(spreadsheet_id, sheet_name, column, start_row)
            .await?
            .unwrap_or_default();

        Ok(rows.iter().filter_map(|row| first_filled(row)).collect())
    }

    #[instrument(name = "Updating values", skip(self, request))]
    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> Result<()> {
        debug!(spreadsheet_id, "Executing BatchUpdateValues");

        if let Err(e) = self
            .backend
            .batch_update_values(spreadsheet_id, request)
            .await
        {
            error!(spreadsheet_id, error = %e, "Error executing BatchUpdateValues");
            return Err(e.into());
        }

        debug!("BatchUpdateValues executed successfully");
        Ok(())
    }

    #[instrument(name = "Validating spreadsheet", skip_all)]
    async fn validate_spreadsheet(&self, request: &ValidationRequest) -> Result<ValidationResult> {
        if let Some(result) = request.input_error() {
            return Ok(result);
        }

        self.sheet_id(&request.spreadsheet_id, &self.required_sheet)
            .await?;

        Ok(ValidationResult::success("Spreadsheet is accessible."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::sheets::mocks::{MockBackend, api_error};
    use google_sheets4::api::ValueRange;
    use serde_json::json;

    const SPREADSHEET: &str = "spreadsheet-1";

    fn accessor(backend: MockBackend) -> SheetAccessor<MockBackend> {
        SheetAccessor::new(backend, "Transactions")
    }

    fn column(cells: &[&str]) -> Option<Vec<RowValues>> {
        Some(
            cells
                .iter()
                .map(|c| match *c {
                    "<missing>" => vec![],
                    c => vec![json!(c)],
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_sheet_id_found() {
        let backend = MockBackend::with_sheets(&[("Summary", 0), ("Transactions", 1234)]);
        let accessor = accessor(backend.clone());

        let id = accessor.sheet_id(SPREADSHEET, "Transactions").await.unwrap();

        assert_eq!(id, 1234);
        assert_eq!(
            *backend.requested_fields.lock().unwrap(),
            vec!["sheets(properties(title,sheetId))".to_string()]
        );
    }

    #[tokio::test]
    async fn test_sheet_id_missing_name() {
        let accessor = accessor(MockBackend::with_sheets(&[("Summary", 5), ("Budget", 6)]));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::SheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_id_match_is_case_sensitive() {
        let accessor = accessor(MockBackend::with_sheets(&[("transactions", 5)]));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::SheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_id_zero_is_not_found() {
        let accessor = accessor(MockBackend::with_sheets(&[("Transactions", 0)]));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::SheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_id_forbidden() {
        let accessor = accessor(MockBackend::with_spreadsheet_error(api_error(
            403,
            "The caller does not have permission",
        )));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        match result {
            Err(AppError::Unauthorized(message)) => {
                assert_eq!(message, "The caller does not have permission")
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sheet_id_spreadsheet_missing() {
        let accessor = accessor(MockBackend::with_spreadsheet_error(api_error(
            404,
            "Requested entity was not found.",
        )));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::SpreadsheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_id_empty_sheet_list() {
        let accessor = accessor(MockBackend::with_sheets(&[]));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::SpreadsheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_sheet_id_other_errors_propagate() {
        let accessor = accessor(MockBackend::with_spreadsheet_error(api_error(
            500,
            "Internal error",
        )));

        let result = accessor.sheet_id(SPREADSHEET, "Transactions").await;

        assert!(matches!(result, Err(AppError::Api(_))));
    }

    #[tokio::test]
    async fn test_first_blank_row_without_data() {
        let backend = MockBackend::with_values(None);
        let accessor = accessor(backend.clone());

        let row = accessor
            .first_blank_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();

        assert_eq!(row, 5);
        assert_eq!(
            *backend.requested_ranges.lock().unwrap(),
            vec!["Transactions!B5:B".to_string()]
        );
    }

    #[tokio::test]
    async fn test_first_blank_row_finds_gap() {
        let accessor = accessor(MockBackend::with_values(column(&["a", "b", "", "c"])));

        let row = accessor
            .first_blank_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();

        assert_eq!(row, 7);
    }

    #[tokio::test]
    async fn test_first_blank_row_treats_missing_and_whitespace_as_blank() {
        let accessor_missing = accessor(MockBackend::with_values(column(&["a", "<missing>", "c"])));
        let accessor_space = accessor(MockBackend::with_values(column(&["a", "b", "c", "  "])));

        let missing = accessor_missing
            .first_blank_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();
        let space = accessor_space
            .first_blank_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();

        assert_eq!(missing, 6);
        assert_eq!(space, 8);
    }

    #[tokio::test]
    async fn test_first_blank_row_after_full_column() {
        let accessor = accessor(MockBackend::with_values(column(&["a", "b", "c"])));

        let row = accessor
            .first_blank_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();

        assert_eq!(row, 8);
    }

    #[tokio::test]
    async fn test_last_filled_row() {
        let accessor = accessor(MockBackend::with_values(column(&["a", "b", "", "c"])));

        let row = accessor
            .last_filled_row(SPREADSHEET, "Transactions", "B", 5)
            .await
            .unwrap();

        assert_eq!(row, 6);
    }

    #[tokio::test]
    async fn test_last_filled_row_empty_column() {
        let accessor = accessor(MockBackend::with_values(None));

        let result = accessor
            .last_filled_row(SPREADSHEET, "Transactions", "B", 5)
            .await;

        assert!(matches!(result, Err(AppError::NoItemFound(_))));
    }

    #[tokio::test]
    async fn test_last_filled_row_blank_start_row() {
        let accessor = accessor(MockBackend::with_values(column(&["", "a"])));

        let result = accessor
            .last_filled_row(SPREADSHEET, "Transactions", "B", 5)
            .await;

        assert!(matches!(result, Err(AppError::NoItemFound(_))));
    }

    #[tokio::test]
    async fn test_insert_row_issues_single_request() {
        let backend = MockBackend::default();
        let accessor = accessor(backend.clone());

        accessor.insert_row(SPREADSHEET, 77, 12).await.unwrap();

        let updates = backend.batch_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let requests = updates[0].requests.as_ref().unwrap();
        assert_eq!(requests.len(), 1);
        let range = requests[0]
            .insert_dimension
            .as_ref()
            .unwrap()
            .range
            .as_ref()
            .unwrap();
        assert_eq!(range.sheet_id, Some(77));
        assert_eq!(range.start_index, Some(11));
        assert_eq!(range.end_index, Some(12));
    }

    #[tokio::test]
    async fn test_delete_row_issues_single_request() {
        let backend = MockBackend::default();
        let accessor = accessor(backend.clone());

        accessor.delete_row(SPREADSHEET, 77, 12).await.unwrap();

        let updates = backend.batch_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let requests = updates[0].requests.as_ref().unwrap();
        assert_eq!(requests.len(), 1);
        let range = requests[0]
            .delete_dimension
            .as_ref()
            .unwrap()
            .range
            .as_ref()
            .unwrap();
        assert_eq!(range.dimension.as_deref(), Some("ROWS"));
        assert_eq!(range.start_index, Some(11));
        assert_eq!(range.end_index, Some(12));
    }

    #[tokio::test]
    async fn test_insert_row_propagates_error() {
        let backend = MockBackend::failing_updates(api_error(400, "Invalid requests[0]"));
        let accessor = accessor(backend.clone());

        let result = accessor.insert_row(SPREADSHEET, 77, 12).await;

        match result {
            Err(AppError::Api(e)) => assert_eq!(api_status(&e), Some(400)),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_row_propagates_error() {
        let backend = MockBackend::failing_updates(api_error(403, "Protected range"));
        let accessor = accessor(backend.clone());

        let result = accessor.delete_row(SPREADSHEET, 77, 12).await;

        match result {
            Err(AppError::Api(e)) => assert_eq!(api_status(&e), Some(403)),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_read_row() {
        let backend = MockBackend::with_values(Some(vec![vec![json!("2025-01-01"), json!(12.5)]]));
        let accessor = accessor(backend.clone());

        let row = accessor
            .read_row(SPREADSHEET, "Transactions", 3)
            .await
            .unwrap();

        assert_eq!(row, Some(vec![json!("2025-01-01"), json!(12.5)]));
        assert_eq!(
            *backend.requested_ranges.lock().unwrap(),
            vec!["Transactions!A3:O3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_read_row_without_data() {
        let accessor = accessor(MockBackend::with_values(None));

        let row = accessor
            .read_row(SPREADSHEET, "Transactions", 3)
            .await
            .unwrap();

        assert_eq!(row, None);
    }

    #[tokio::test]
    async fn test_read_column_filters_blanks() {
        let accessor = accessor(MockBackend::with_values(column(&[
            "", "x", " ", "<missing>", "y",
        ])));

        let values = accessor
            .read_column(SPREADSHEET, "Transactions", "C", 2)
            .await
            .unwrap();

        assert_eq!(values, vec!["x".to_string(), "y".to_string()]);
    }

    #[tokio::test]
    async fn test_read_column_without_data() {
        let accessor = accessor(MockBackend::with_values(None));

        let values = accessor
            .read_column(SPREADSHEET, "Transactions", "C", 2)
            .await
            .unwrap();

        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_batch_update_values_forwards_request() {
        let backend = MockBackend::default();
        let accessor = accessor(backend.clone());
        let request = BatchUpdateValuesRequest {
            value_input_option: Some("USER_ENTERED".to_string()),
            data: Some(vec![ValueRange {
                range: Some("Transactions!A2:B2".to_string()),
                values: Some(vec![vec![json!("Coffee"), json!(3.2)]]),
                ..Default::default()
            }]),
            ..Default::default()
        };

        accessor
            .batch_update_values(SPREADSHEET, request.clone())
            .await
            .unwrap();

        let updates = backend.value_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            serde_json::to_value(&updates[0]).unwrap(),
            serde_json::to_value(&request).unwrap()
        );
    }

    #[tokio::test]
    async fn test_batch_update_values_propagates_error() {
        let backend = MockBackend::failing_updates(api_error(400, "Invalid range"));
        let accessor = accessor(backend.clone());

        let result = accessor
            .batch_update_values(SPREADSHEET, BatchUpdateValuesRequest::default())
            .await;

        match result {
            Err(AppError::Api(e)) => assert_eq!(api_status(&e), Some(400)),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_validate_blank_id_skips_network() {
        let backend = MockBackend::default();
        let accessor = accessor(backend.clone());

        for id in ["", "   "] {
            let result = accessor
                .validate_spreadsheet(&ValidationRequest::new(id))
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.error_code, Some(ErrorCode::InvalidInput));
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_checks_required_sheet() {
        let backend = MockBackend::with_sheets(&[("Transactions", 9)]);
        let accessor = accessor(backend.clone());

        let result = accessor
            .validate_spreadsheet(&ValidationRequest::new(SPREADSHEET))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.error_code, None);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_validate_propagates_resolution_failure() {
        let accessor = accessor(MockBackend::with_sheets(&[("Budget", 9)]));

        let result = accessor
            .validate_spreadsheet(&ValidationRequest::new(SPREADSHEET))
            .await;

        assert!(matches!(result, Err(AppError::SheetNotFound(_))));
    }
}
