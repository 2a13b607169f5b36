//! Whole-document endpoints: read, backup download, restore upload.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::app::dto::{self, MessageResponse};
use crate::app::errors;
use crate::app::services::{run_blocking, AppServices};

pub async fn get_data(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match run_blocking(services, |s| Ok(s.document())).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to read data"),
    }
}

pub async fn download_backup(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let document = match run_blocking(services, |s| Ok(s.document())).await {
        Ok(document) => document,
        Err(e) => return errors::ledger_error_to_response(e, "Failed to create backup"),
    };
    let filename = dto::backup_filename(Utc::now());

    let disposition = match HeaderValue::from_str(&format!("attachment; filename={filename}")) {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create backup")
        }
    };

    tracing::info!(%filename, items = document.inventory.len(), sales = document.sales.len(), "backup downloaded");
    (
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(document),
    )
        .into_response()
}

pub async fn restore(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match run_blocking(services, move |s| s.restore(payload)).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::ok("Data restored successfully")),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e, "Failed to restore data"),
    }
}
