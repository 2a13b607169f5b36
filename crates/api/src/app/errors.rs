use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopledger_core::LedgerError;

/// Map a ledger failure to a JSON error response.
///
/// `storage_message` is what the caller sees when persistence fails; the
/// underlying IO error is logged, not returned.
pub fn ledger_error_to_response(
    err: LedgerError,
    storage_message: &'static str,
) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        LedgerError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        e @ LedgerError::InsufficientStock { .. } => {
            json_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        e @ LedgerError::NotFound(_) => json_error(StatusCode::NOT_FOUND, e.to_string()),
        LedgerError::Storage(detail) => {
            tracing::error!(%detail, "request failed on storage");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, storage_message)
        }
    }
}

/// A request body that was not valid JSON or did not match the expected shape.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (LedgerError::validation("bad"), StatusCode::BAD_REQUEST),
            (LedgerError::invalid_id("x"), StatusCode::BAD_REQUEST),
            (
                LedgerError::InsufficientStock {
                    requested: 2,
                    available: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::not_found("Item"), StatusCode::NOT_FOUND),
            (LedgerError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ledger_error_to_response(err, "Failed").status(), status);
        }
    }
}
