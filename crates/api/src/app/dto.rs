use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use repairdesk_core::DomainError;
use repairdesk_repairs::{JobFilter, RepairStatus};

use crate::app::errors;

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: RepairStatus,
}

/// `GET /repairs` query string. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub status: Option<String>,
    pub technician_id: Option<String>,
    pub customer_id: Option<String>,
    pub q: Option<String>,
}

impl JobQuery {
    pub fn into_filter(self) -> Result<JobFilter, DomainError> {
        Ok(JobFilter {
            status: parse_optional(self.status)?,
            technician_id: parse_optional(self.technician_id)?,
            customer_id: parse_optional(self.customer_id)?,
            text: self.q.filter(|q| !q.trim().is_empty()),
        })
    }
}

fn parse_optional<T>(raw: Option<String>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Parse a path id into its typed form, or a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}

pub fn ok<T: Serialize>(body: T) -> axum::response::Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub fn created<T: Serialize>(body: T) -> axum::response::Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

pub fn items<T: Serialize>(items: Vec<T>) -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
