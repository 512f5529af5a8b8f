use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use repairdesk_core::DomainError;
use repairdesk_infra::{ServiceError, StoreError};
use repairdesk_inventory::StockError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::InsufficientStock(e) => stock_error_to_response(e),
        ServiceError::InUse { .. } => json_error(StatusCode::CONFLICT, "in_use", err.to_string()),
        ServiceError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

fn stock_error_to_response(err: StockError) -> axum::response::Response {
    let message = err.to_string();
    let body = match err {
        StockError::InsufficientStock { part_id, part_name, current, shortfall } => json!({
            "error": "insufficient_stock",
            "message": message,
            "partId": part_id.as_str(),
            "partName": part_name,
            "current": current,
            "shortfall": shortfall,
        }),
        StockError::OutOfRange { part_id, part_name, current, delta } => json!({
            "error": "stock_out_of_range",
            "message": message,
            "partId": part_id.as_str(),
            "partName": part_name,
            "current": current,
            "delta": delta,
        }),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
}

fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::AlreadyExists { .. } => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        other => {
            tracing::error!(error = %other, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string())
        }
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
