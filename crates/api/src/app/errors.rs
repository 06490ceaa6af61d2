use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::services::ItemError;

pub fn item_error_to_response(err: ItemError) -> axum::response::Response {
    match err {
        ItemError::Validation { errors, input } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "validation_error",
                "message": "the given data was invalid",
                "errors": errors,
                "old": input,
            })),
        )
            .into_response(),
        ItemError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        ItemError::Persistence { message, input, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "persistence_error",
                "message": message,
                "old": input,
            })),
        )
            .into_response(),
    }
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
