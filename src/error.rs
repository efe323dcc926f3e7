use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Every failure the service can report to a caller.
///
/// User-caused variants render as 400 with the exact message a client is
/// expected to match on; anything internal renders as a generic 500 and is
/// logged server-side instead of leaked.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No 'dataset' file part found.")]
    MissingDatasetPart,

    #[error("Failed reading CSV: {0}")]
    CsvParse(String),

    #[error("Missing columns in CSV: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Missing inputs: {0:?}")]
    MissingInputs(Vec<String>),

    #[error("Model not trained yet. Train first.")]
    ModelNotTrained,

    #[error("Not enough data for a stratified holdout: {0}")]
    InsufficientData(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Internal(cause) = self {
            error!("internal error: {cause:#}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
