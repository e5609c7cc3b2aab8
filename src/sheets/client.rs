use super::SheetsBackend;
use crate::config::GoogleConfig;
use crate::error::Result;
use crate::sheets::auth::create_and_verify_authenticator;
use async_trait::async_trait;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, BatchUpdateValuesRequest, Scope, Sheets, Spreadsheet,
    ValueRange,
};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::{debug, instrument};

// Read and write access to any spreadsheet the user can open
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

/// Authenticated Google Sheets API hub.
pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = create_and_verify_authenticator(config).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
        })
    }
}

#[async_trait]
impl SheetsBackend for SheetsClient {
    async fn get_sheet_properties(
        &self,
        spreadsheet_id: &str,
        fields: &str,
    ) -> google_sheets4::Result<Spreadsheet> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(spreadsheet_id)
            .param("fields", fields)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await?;

        Ok(spreadsheet)
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> google_sheets4::Result<ValueRange> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await?;

        Ok(value_range)
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateSpreadsheetRequest,
    ) -> google_sheets4::Result<()> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .batch_update(request, spreadsheet_id)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await?;

        debug!(
            replies = response.replies.map(|r| r.len()).unwrap_or_default(),
            "Applied spreadsheet update"
        );
        Ok(())
    }

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> google_sheets4::Result<()> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_batch_update(request, spreadsheet_id)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await?;

        debug!(
            updated_cells = response.total_updated_cells.unwrap_or_default(),
            "Applied value update"
        );
        Ok(())
    }
}
