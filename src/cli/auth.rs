use crate::config::Config;
use crate::error::Result;
use crate::sheets::{SheetsClient, clear_sheets_tokens};
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum AuthProvider {
    /// Authenticate with Google Sheets
    Google,
}

impl AuthProvider {
    pub async fn execute(&self, reset: bool) -> Result<()> {
        match self {
            AuthProvider::Google => authenticate_google(reset).await,
        }
    }
}

async fn authenticate_google(reset: bool) -> Result<()> {
    if reset {
        clear_sheets_tokens()?;
    }

    let config = Config::load()?;
    let _client = SheetsClient::new(&config.google).await?;

    info!("Google Sheets authentication verified");

    Ok(())
}
