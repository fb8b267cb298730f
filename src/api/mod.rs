//! REST API module.
//!
//! Views read records and dispatch bookmark intents through these handlers;
//! they never write store state any other way.
//!
//! Every response, including errors and malformed path segments, carries the
//! store revision it was computed from as `revisionId`.

mod events;
mod groups;
mod records;
mod snapshot;

pub use events::*;
pub use groups::*;
pub use records::*;
pub use snapshot::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::RecordId;

/// Success envelope: `{ success: true, data, revisionId }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: u64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

pub fn success<T: Serialize>(data: T, revision_id: u64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

pub fn error<T: Serialize>(err: AppError, revision_id: u64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Record ids arrive as raw path segments so a bad one still gets the
/// error envelope.
pub(crate) fn parse_record_id(raw: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid record id: {}", raw)))
}

pub(crate) fn parse_item_index(raw: &str) -> Result<usize, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid item index: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("42"), Ok(42));
        assert_eq!(parse_record_id("-7"), Ok(-7));
        assert!(matches!(
            parse_record_id("not-a-number"),
            Err(AppError::BadRequest(_))
        ));
        assert!(parse_record_id("").is_err());
    }

    #[test]
    fn test_parse_item_index() {
        assert_eq!(parse_item_index("0"), Ok(0));
        assert!(matches!(parse_item_index("-1"), Err(AppError::BadRequest(_))));
        assert!(parse_item_index("one").is_err());
    }
}
