use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use folio_engine::media::UploadError;
use folio_engine::{SiteError, ValidationErrors};
use thiserror::Error;

use crate::ui;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("storage unavailable")]
    StorageUnavailable,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<SiteError> for AppError {
    fn from(e: SiteError) -> Self {
        match e {
            SiteError::Validation(errors) => AppError::Validation(errors),
            SiteError::NotFound { .. } => AppError::NotFound,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Validation(ValidationErrors::single("file", e.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Html(ui::pages::not_found())).into_response()
            }
            AppError::Validation(errors) => {
                let body = errors
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.path, e.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::StorageUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            AppError::Internal(ref e) => {
                log::error!("Request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
