use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

use crate::validation::Errors;

pub type PanelResult<T> = Result<T, PanelError>;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("record not found")]
    NotFound,

    /// The actor may not touch this record. Surfaces as a silent redirect to root.
    #[error("not authorized")]
    Forbidden,

    /// Submitted input was rejected. Form handlers re-render; anything else answers 422.
    #[error("validation failed: {0}")]
    Invalid(Errors),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        match self {
            PanelError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            PanelError::Forbidden => Redirect::to("/").into_response(),
            PanelError::Invalid(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()).into_response()
            }
            PanelError::Internal(e) => {
                error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
