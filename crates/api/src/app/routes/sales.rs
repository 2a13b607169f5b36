use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use shopledger_core::SaleId;
use shopledger_sales::RecordSale;

use crate::app::dto::{MessageResponse, SaleResponse};
use crate::app::errors;
use crate::app::services::{run_blocking, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/:id", delete(delete_sale))
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match run_blocking(services, |s| Ok(s.sales())).await {
        Ok(sales) => (StatusCode::OK, Json(sales)).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to read sales"),
    }
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RecordSale>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(services, move |s| s.record_sale(body)).await {
        Ok(sale) => (StatusCode::OK, Json(SaleResponse::ok(sale))).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to save sale"),
    }
}

pub async fn delete_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let sale_id: SaleId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid sale id"),
    };

    match run_blocking(services, move |s| s.delete_sale(sale_id)).await {
        Ok(removal) => {
            let message = if removal.stock_restored {
                "Sale deleted and inventory restored"
            } else {
                "Sale deleted; item no longer in inventory"
            };
            (StatusCode::OK, Json(MessageResponse::ok(message))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e, "Failed to delete sale"),
    }
}
