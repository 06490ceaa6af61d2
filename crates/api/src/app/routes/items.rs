use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use serde_json::json;
use tower_cookies::Cookies;

use stockroom_core::ItemId;
use stockroom_inventory::ItemForm;

use crate::app::dto::{FormOrJson, ListQuery, MethodOverride, SpoofedMethod};
use crate::app::flash::{self, Flash};
use crate::app::services::{AppServices, ItemError};
use crate::app::{errors, views};

const ITEMS_PATH: &str = "/items";

pub fn router() -> Router {
    Router::new()
        .route("/", get(index).post(store))
        .route("/new", get(create))
        .route(
            "/:id",
            get(show)
                .put(update)
                .patch(update)
                .delete(destroy)
                .post(override_method),
        )
        .route("/:id/edit", get(edit))
}

fn parse_id(raw: &str) -> Result<ItemId, ItemError> {
    raw.parse::<ItemId>().map_err(ItemError::from)
}

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
    cookies: Cookies,
) -> Response {
    let search = query.search();
    let page = match services.items.list(search, query.page_request()).await {
        Ok(p) => p,
        Err(e) => return errors::item_error_to_response(e),
    };

    views::render(
        views::ITEMS_INDEX,
        json!({ "items": page, "search": search }),
        flash::take(&cookies),
    )
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    cookies: Cookies,
) -> Response {
    let form = match services.items.create_form().await {
        Ok(f) => f,
        Err(e) => return errors::item_error_to_response(e),
    };

    views::render(
        views::ITEMS_CREATE,
        json!({
            "categories": form.categories,
            "category_types": form.category_types,
        }),
        flash::take(&cookies),
    )
}

pub async fn store(
    Extension(services): Extension<Arc<AppServices>>,
    cookies: Cookies,
    FormOrJson(input): FormOrJson<ItemForm>,
) -> Response {
    match services.items.create(input).await {
        Ok(_) => flash::redirect(&cookies, ITEMS_PATH, Flash::ItemSaved),
        Err(e) => errors::item_error_to_response(e),
    }
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    cookies: Cookies,
) -> Response {
    let detail = match parse_id(&id) {
        Ok(id) => services.items.show(id).await,
        Err(e) => Err(e),
    };
    let detail = match detail {
        Ok(d) => d,
        Err(e) => return errors::item_error_to_response(e),
    };

    views::render(
        views::ITEMS_SHOW,
        json!({
            "item": detail.item,
            "category_description": detail.category_description,
        }),
        flash::take(&cookies),
    )
}

pub async fn edit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    cookies: Cookies,
) -> Response {
    let form = match parse_id(&id) {
        Ok(id) => services.items.edit_form(id).await,
        Err(e) => Err(e),
    };
    let form = match form {
        Ok(f) => f,
        Err(e) => return errors::item_error_to_response(e),
    };

    views::render(
        views::ITEMS_EDIT,
        json!({ "item": form.item, "categories": form.categories }),
        flash::take(&cookies),
    )
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    cookies: Cookies,
    FormOrJson(input): FormOrJson<ItemForm>,
) -> Response {
    apply_update(&services, &cookies, &id, input).await
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    cookies: Cookies,
) -> Response {
    apply_destroy(&services, &cookies, &id).await
}

/// `POST /items/:id` carrying a `_method` field.
pub async fn override_method(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    cookies: Cookies,
    FormOrJson(body): FormOrJson<MethodOverride>,
) -> Response {
    match body.spoofed() {
        Some(SpoofedMethod::Update) => apply_update(&services, &cookies, &id, body.form).await,
        Some(SpoofedMethod::Delete) => apply_destroy(&services, &cookies, &id).await,
        None => errors::json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "_method must be PUT, PATCH or DELETE",
        ),
    }
}

async fn apply_update(
    services: &AppServices,
    cookies: &Cookies,
    id: &str,
    input: ItemForm,
) -> Response {
    let result = match parse_id(id) {
        Ok(id) => services.items.update(id, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => flash::redirect(cookies, ITEMS_PATH, Flash::ItemUpdated),
        Err(e) => errors::item_error_to_response(e),
    }
}

async fn apply_destroy(services: &AppServices, cookies: &Cookies, id: &str) -> Response {
    let result = match parse_id(id) {
        Ok(id) => services.items.destroy(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => flash::redirect(cookies, ITEMS_PATH, Flash::ItemDeleted),
        Err(e) => {
            tracing::warn!(item_id = %id, error = %e, "item delete failed");
            flash::redirect(cookies, ITEMS_PATH, Flash::DeleteFailed)
        }
    }
}
