mod auth;
mod sheet;
mod show;

use crate::error::Result;
use clap::{Parser, Subcommand};

pub use auth::AuthProvider;
pub use sheet::SheetCommand;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "budget-sheets")]
#[command(about = "Query and edit budget spreadsheets in Google Sheets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Spreadsheet to operate on (defaults to spreadsheet.id from the config file)
    #[arg(long, global = true)]
    pub spreadsheet_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Sheet(command) => command.execute(self.spreadsheet_id.as_deref()).await,
            Commands::Show { resource } => resource.execute().await,
            Commands::Auth { provider, reset } => provider.execute(*reset).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Sheet(SheetCommand),
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    Auth {
        #[command(subcommand)]
        provider: AuthProvider,
        /// Clear cached tokens before authenticating
        #[arg(long, global = true)]
        reset: bool,
    },
}
