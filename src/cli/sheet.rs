use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ValidationRequest, ValidationResult};
use crate::sheets::{SheetAccessor, SheetOperations, SheetsClient};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use google_sheets4::api::BatchUpdateValuesRequest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A column scanned from a start row downward.
#[derive(Args, Debug)]
pub struct ColumnTarget {
    /// Sheet (tab) name
    pub sheet: String,
    /// Column letter(s), e.g. B
    pub column: String,
    /// First row to scan (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..))]
    pub start_row: i32,
}

/// A single row of a sheet.
#[derive(Args, Debug)]
pub struct RowTarget {
    /// Sheet (tab) name
    pub sheet: String,
    /// Row number (1-based)
    #[arg(value_parser = clap::value_parser!(i32).range(1..))]
    pub row: i32,
}

#[derive(Subcommand, Debug)]
pub enum SheetCommand {
    /// Show the numeric id of a sheet
    SheetId {
        /// Sheet (tab) name
        sheet: String,
    },
    /// Find the first blank row in a column
    FirstBlankRow {
        #[command(flatten)]
        target: ColumnTarget,
    },
    /// Find the last filled row in a column
    LastRow {
        #[command(flatten)]
        target: ColumnTarget,
    },
    /// Insert an empty row, shifting later rows down
    InsertRow {
        #[command(flatten)]
        target: RowTarget,
    },
    /// Delete a row, shifting later rows up
    DeleteRow {
        #[command(flatten)]
        target: RowTarget,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the values of a row (columns A to O) as JSON
    ReadRow {
        #[command(flatten)]
        target: RowTarget,
    },
    /// Print the non-blank values of a column, one per line
    ReadColumn {
        #[command(flatten)]
        target: ColumnTarget,
    },
    /// Apply a values batch update read from a JSON file
    BatchUpdate {
        /// JSON file holding a BatchUpdateValuesRequest
        file: PathBuf,
    },
    /// Check that the spreadsheet is reachable and has the required sheet
    Validate,
}

impl SheetCommand {
    pub async fn execute(&self, spreadsheet_id: Option<&str>) -> Result<()> {
        let config = Config::load()?;

        let spreadsheet_id = match self {
            SheetCommand::Validate => spreadsheet_id
                .map(str::to_string)
                .or_else(|| config.spreadsheet.id.clone())
                .unwrap_or_default(),
            _ => config.spreadsheet_id(spreadsheet_id)?,
        };

        // A blank id fails validation before any authentication happens.
        if let Some(result) = self.offline_validation(&spreadsheet_id) {
            return print_validation(&result);
        }

        let client = SheetsClient::new(&config.google).await?;
        let accessor = SheetAccessor::new(client, config.spreadsheet.required_sheet.clone());

        self.run(&accessor, &spreadsheet_id).await
    }

    fn offline_validation(&self, spreadsheet_id: &str) -> Option<ValidationResult> {
        match self {
            SheetCommand::Validate => ValidationRequest::new(spreadsheet_id).input_error(),
            _ => None,
        }
    }

    async fn run<S>(&self, sheets: &S, spreadsheet_id: &str) -> Result<()>
    where
        S: SheetOperations + Sync,
    {
        match self {
            SheetCommand::SheetId { sheet } => {
                let sheet_id = sheets.sheet_id(spreadsheet_id, sheet).await?;
                println!("{}", sheet_id);
            }
            SheetCommand::FirstBlankRow { target } => {
                let row = sheets
                    .first_blank_row(spreadsheet_id, &target.sheet, &target.column, target.start_row)
                    .await?;
                println!("{}", row);
            }
            SheetCommand::LastRow { target } => {
                let row = sheets
                    .last_filled_row(spreadsheet_id, &target.sheet, &target.column, target.start_row)
                    .await?;
                println!("{}", row);
            }
            SheetCommand::InsertRow { target } => {
                let sheet_id = sheets.sheet_id(spreadsheet_id, &target.sheet).await?;
                sheets.insert_row(spreadsheet_id, sheet_id, target.row).await?;
                info!(sheet = %target.sheet, row = target.row, "Row inserted");
            }
            SheetCommand::DeleteRow { target, yes } => {
                if !yes && !confirm_delete(target)? {
                    info!("Aborted");
                    return Ok(());
                }
                let sheet_id = sheets.sheet_id(spreadsheet_id, &target.sheet).await?;
                sheets.delete_row(spreadsheet_id, sheet_id, target.row).await?;
                info!(sheet = %target.sheet, row = target.row, "Row deleted");
            }
            SheetCommand::ReadRow { target } => {
                let values = sheets
                    .read_row(spreadsheet_id, &target.sheet, target.row)
                    .await?
                    .unwrap_or_default();
                println!("{}", serde_json::to_string(&values)?);
            }
            SheetCommand::ReadColumn { target } => {
                let values = sheets
                    .read_column(spreadsheet_id, &target.sheet, &target.column, target.start_row)
                    .await?;
                for value in values {
                    println!("{}", value);
                }
            }
            SheetCommand::BatchUpdate { file } => {
                let request = read_update_request(file)?;
                sheets.batch_update_values(spreadsheet_id, request).await?;
                info!(file = ?file, "Values updated");
            }
            SheetCommand::Validate => {
                let result = sheets
                    .validate_spreadsheet(&ValidationRequest::new(spreadsheet_id))
                    .await?;
                print_validation(&result)?;
            }
        }

        Ok(())
    }
}

fn print_validation(result: &ValidationResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn confirm_delete(target: &RowTarget) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "Delete row {} of sheet '{}'?",
            target.row, target.sheet
        ))
        .default(false)
        .interact()
        .map_err(|e| AppError::Other(e.into()))
}

fn read_update_request(file: &Path) -> Result<BatchUpdateValuesRequest> {
    let contents = fs::read_to_string(file)?;
    Ok(serde_json::from_str(&contents)?)
}
