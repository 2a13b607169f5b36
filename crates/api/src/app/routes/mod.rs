use axum::{routing::get, Router};

pub mod backup;
pub mod inventory;
pub mod sales;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/data", get(backup::get_data))
        .route("/backup", get(backup::download_backup))
        .route("/restore", axum::routing::post(backup::restore))
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
}
