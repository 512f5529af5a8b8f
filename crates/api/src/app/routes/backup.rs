use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use repairdesk_infra::{Backup, RepairShop};

use crate::app::errors;
use crate::app::routes::common::respond;

/// Whole-shop export, served as a JSON attachment.
pub async fn export_backup(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    let backup = match shop.export_backup().await {
        Ok(b) => b,
        Err(e) => return errors::service_error_to_response(e),
    };

    let disposition = backup
        .exported_at
        .map(|at| format!("attachment; filename=\"{}\"", Backup::file_name(at)))
        .unwrap_or_else(|| "attachment".to_string());

    (StatusCode::OK, [(header::CONTENT_DISPOSITION, disposition)], Json(backup)).into_response()
}

/// Replace all shop data with an uploaded backup.
pub async fn import_backup(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let backup = match Backup::from_json(body) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };
    respond(shop.import_backup(backup).await)
}

pub async fn seed(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond(shop.seed_sample_data().await)
}
