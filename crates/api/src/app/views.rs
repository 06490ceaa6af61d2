//! View documents handed to the presentation layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::app::flash::{Flash, FlashBody};

pub const ITEMS_INDEX: &str = "items.index";
pub const ITEMS_CREATE: &str = "items.create";
pub const ITEMS_SHOW: &str = "items.show";
pub const ITEMS_EDIT: &str = "items.edit";

#[derive(Debug, Serialize)]
struct ViewDocument {
    view: &'static str,
    data: JsonValue,
    flash: Option<FlashBody>,
}

/// Render `view` with its named values and the flash message, if any.
pub fn render(view: &'static str, data: JsonValue, flash: Option<Flash>) -> Response {
    let document = ViewDocument {
        view,
        data,
        flash: flash.map(Flash::body),
    };
    (StatusCode::OK, Json(document)).into_response()
}
