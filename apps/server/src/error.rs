use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use folio_core::errors::{Error as CoreError, LedgerError, PersistenceError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Ledger(LedgerError::UnknownSymbol(_)) => StatusCode::NOT_FOUND,
        CoreError::Ledger(LedgerError::InsufficientQuantity { .. }) => StatusCode::CONFLICT,
        CoreError::Ledger(LedgerError::IndexOutOfRange { .. }) => StatusCode::BAD_REQUEST,
        CoreError::Persistence(PersistenceError::VersionConflict { .. }) => StatusCode::CONFLICT,
        CoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::Performance(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::MarketData(_) => StatusCode::BAD_GATEWAY,
        CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => core_status(e),
        };
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
