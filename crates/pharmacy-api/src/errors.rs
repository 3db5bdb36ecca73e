use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pharmacy_core::PharmacyError;

pub fn pharmacy_error_to_response(err: PharmacyError) -> axum::response::Response {
    match err {
        PharmacyError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        PharmacyError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{} not found", what))
        }
        PharmacyError::Capacity {
            requested,
            available,
        } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            format!(
                "insufficient stock: requested {}, available {}",
                requested, available
            ),
        ),
        PharmacyError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        PharmacyError::Storage(detail) => {
            tracing::error!(error = %detail, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage error",
            )
        }
    }
}

/// Malformed bodies, wrong types and unknown fields all surface as validation errors.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        rejection.body_text(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_id(raw: &str, what: &str) -> Result<i64, axum::response::Response> {
    raw.trim().parse::<i64>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{} must be an integer, got {:?}", what, raw),
        )
    })
}

/// PUT or DELETE on a collection path, where the id segment was left out.
pub fn missing_id(what: &str) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("{} is required in the path", what),
    )
}
