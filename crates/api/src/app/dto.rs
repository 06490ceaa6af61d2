use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use stockroom_infra::PageRequest;
use stockroom_inventory::ItemForm;

// -------------------------
// Request DTOs
// -------------------------

/// Query string of the item listing.
///
/// `page` is kept as text so that garbage falls back to the first page
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.as_deref().and_then(|p| p.trim().parse().ok()))
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Body of `POST /items/{id}` from HTML forms that cannot send PUT/DELETE.
#[derive(Debug, Deserialize)]
pub struct MethodOverride {
    #[serde(rename = "_method")]
    pub method: Option<String>,
    #[serde(flatten)]
    pub form: ItemForm,
}

/// Spoofed method carried by a [`MethodOverride`] body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpoofedMethod {
    Update,
    Delete,
}

impl MethodOverride {
    pub fn spoofed(&self) -> Option<SpoofedMethod> {
        match self.method.as_deref().map(str::trim)?.to_ascii_uppercase().as_str() {
            "PUT" | "PATCH" => Some(SpoofedMethod::Update),
            "DELETE" => Some(SpoofedMethod::Delete),
            _ => None,
        }
    }
}

// -------------------------
// Extractors
// -------------------------

/// Deserializes the body as JSON when the request says so, otherwise as an
/// urlencoded form.
#[derive(Debug)]
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

/// Whether the MIME essence of `Content-Type` is `application/json`.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
