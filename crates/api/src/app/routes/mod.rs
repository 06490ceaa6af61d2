use axum::Router;

pub mod items;
pub mod system;

/// Router for the item resource.
pub fn router() -> Router {
    Router::new().nest("/items", items::router())
}
