use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, DeleteDimensionRequest, DimensionRange,
    InsertDimensionRequest, Request,
};

/// Partial response mask for sheet metadata: titles and ids only.
pub(crate) const SHEET_PROPERTIES_FIELDS: &str = "sheets(properties(title,sheetId))";

const ROWS_DIMENSION: &str = "ROWS";

// Fixed window read for a single row.
const ROW_FIRST_COLUMN: &str = "A";
const ROW_LAST_COLUMN: &str = "O";

/// `Sheet!B5:B` - a single column from `start_row` to the end of the data.
pub(crate) fn column_range(sheet_name: &str, column: &str, start_row: i32) -> String {
    format!("{}!{}{}:{}", sheet_name, column, start_row, column)
}

/// `Sheet!A5:O5` - the fixed-width window of one row.
pub(crate) fn row_range(sheet_name: &str, row_index: i32) -> String {
    format!(
        "{}!{}{}:{}{}",
        sheet_name, ROW_FIRST_COLUMN, row_index, ROW_LAST_COLUMN, row_index
    )
}

/// Half-open zero-based range covering exactly the 1-based `row_index`.
fn single_row(sheet_id: i32, row_index: i32) -> DimensionRange {
    DimensionRange {
        sheet_id: Some(sheet_id),
        dimension: Some(ROWS_DIMENSION.to_string()),
        start_index: Some(row_index - 1),
        end_index: Some(row_index),
    }
}

/// Insert one empty row at `row_index`, shifting later rows down.
pub(crate) fn insert_row_request(sheet_id: i32, row_index: i32) -> BatchUpdateSpreadsheetRequest {
    let request = Request {
        insert_dimension: Some(InsertDimensionRequest {
            range: Some(single_row(sheet_id, row_index)),
            ..Default::default()
        }),
        ..Default::default()
    };

    BatchUpdateSpreadsheetRequest {
        requests: Some(vec![request]),
        ..Default::default()
    }
}

/// Remove the row at `row_index`, shifting later rows up.
pub(crate) fn delete_row_request(sheet_id: i32, row_index: i32) -> BatchUpdateSpreadsheetRequest {
    let request = Request {
        delete_dimension: Some(DeleteDimensionRequest {
            range: Some(single_row(sheet_id, row_index)),
        }),
        ..Default::default()
    };

    BatchUpdateSpreadsheetRequest {
        requests: Some(vec![request]),
        ..Default::default()
    }
}
