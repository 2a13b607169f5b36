use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use shopledger_core::ItemId;
use shopledger_inventory::{ItemPatch, NewItem};

use crate::app::dto::{ItemResponse, MessageResponse};
use crate::app::errors;
use crate::app::services::{run_blocking, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(add_item))
        .route("/:id", put(update_item).delete(delete_item))
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match run_blocking(services, |s| Ok(s.inventory())).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to read inventory"),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewItem>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(services, move |s| s.add_item(body)).await {
        Ok(item) => (StatusCode::OK, Json(ItemResponse::ok(item))).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to save item"),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid item id"),
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(services, move |s| s.update_item(item_id, patch)).await {
        Ok(item) => (StatusCode::OK, Json(ItemResponse::ok(item))).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to update item"),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid item id"),
    };

    match run_blocking(services, move |s| s.delete_item(item_id)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::ok("Item deleted successfully")),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to delete item"),
    }
}
