pub mod bulk_handlers;
pub mod id_proof_handlers;
pub mod record_handlers;

pub use bulk_handlers::*;
pub use id_proof_handlers::*;
pub use record_handlers::*;

use axum::{Json, http::StatusCode};

use crate::{adapters::inbound::http::dto::ErrorResponseDto, domain::errors::RecordError};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponseDto>);

/// Map a core error to its status code and body
pub fn record_error(error: RecordError) -> ApiError {
    let status_code = StatusCode::from(error.kind());
    (status_code, Json(ErrorResponseDto::from_record_error(&error)))
}

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponseDto::bad_request(message)),
    )
}
