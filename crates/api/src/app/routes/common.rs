use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use repairdesk_infra::ServiceResult;

use crate::app::{dto, errors};

pub fn respond<T: Serialize>(result: ServiceResult<T>) -> axum::response::Response {
    match result {
        Ok(body) => dto::ok(body),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub fn respond_created<T: Serialize>(result: ServiceResult<T>) -> axum::response::Response {
    match result {
        Ok(body) => dto::created(body),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub fn respond_list<T: Serialize>(result: ServiceResult<Vec<T>>) -> axum::response::Response {
    match result {
        Ok(items) => dto::items(items),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub fn respond_deleted(result: ServiceResult<()>) -> axum::response::Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
