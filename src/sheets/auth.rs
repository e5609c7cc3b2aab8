use crate::config::{Config, GoogleConfig};
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};
use yup_oauth2::{
    ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
    authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_CERT_URL: &str = "https://www.googleapis.com/oauth2/v1/certs";
const GOOGLE_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

const TOKEN_CACHE_FILE: &str = "google_tokens.json";

type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Build an authenticator and make sure it can issue a spreadsheet token.
///
/// The first run prompts for an authorization code; later runs reuse the
/// token cached on disk.
pub(super) async fn create_and_verify_authenticator(config: &GoogleConfig) -> Result<AuthType> {
    let auth = installed_flow(config).await?;

    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

fn application_secret(config: &GoogleConfig) -> ApplicationSecret {
    ApplicationSecret {
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
        auth_uri: GOOGLE_AUTH_URL.to_string(),
        token_uri: GOOGLE_TOKEN_URL.to_string(),
        auth_provider_x509_cert_url: Some(GOOGLE_CERT_URL.to_string()),
        redirect_uris: vec![GOOGLE_REDIRECT_URI.to_string()],
        project_id: None,
        client_email: None,
        client_x509_cert_url: None,
    }
}

async fn installed_flow(config: &GoogleConfig) -> Result<AuthType> {
    let token_cache_path = token_cache_path()?;

    if let Some(parent) = token_cache_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Auth(format!("Failed to create token cache directory: {}", e))
        })?;
    }

    InstalledFlowAuthenticator::builder(
        application_secret(config),
        InstalledFlowReturnMethod::Interactive,
    )
    .persist_tokens_to_disk(token_cache_path)
    .build()
    .await
    .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))
}

/// Clear cached Google tokens by deleting the token cache file
#[instrument(name = "Clearing auth tokens for Google Sheets", skip_all)]
pub fn clear_tokens() -> Result<()> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        debug!("No Google Sheets tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| AppError::Auth(format!("Failed to delete tokens file: {}", e)))?;
    debug!(path = ?token_path, "Cleared Google Sheets cached tokens");

    Ok(())
}

fn token_cache_path() -> Result<PathBuf> {
    Config::cache_file(TOKEN_CACHE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_secret_uses_config_credentials() {
        let config = GoogleConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        };

        let secret = application_secret(&config);

        assert_eq!(secret.client_id, "client");
        assert_eq!(secret.client_secret, "secret");
        assert_eq!(secret.token_uri, GOOGLE_TOKEN_URL);
        assert_eq!(secret.redirect_uris, vec![GOOGLE_REDIRECT_URI.to_string()]);
    }
}
