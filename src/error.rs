use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    SpreadsheetNotFound(String),

    #[error("{0}")]
    SheetNotFound(String),

    #[error("{0}")]
    NoItemFound(String),

    #[error("Google Sheets API error: {0}")]
    Api(#[from] google_sheets4::Error),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// HTTP status reported by a failed Google API call, if the error carries one.
///
/// A non-success response with a JSON body surfaces as `BadRequest` holding
/// `{"error": {"code": 403, ...}}`; one without a parseable body surfaces as
/// `Failure` holding the raw response.
pub fn api_status(err: &google_sheets4::Error) -> Option<u16> {
    match err {
        google_sheets4::Error::BadRequest(body) => body
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|code| code.as_u64())
            .and_then(|code| u16::try_from(code).ok()),
        google_sheets4::Error::Failure(response) => Some(response.status().as_u16()),
        _ => None,
    }
}

/// Human readable message of a failed Google API call.
pub fn api_message(err: &google_sheets4::Error) -> String {
    match err {
        google_sheets4::Error::BadRequest(body) => body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string()),
        _ => err.to_string(),
    }
}
