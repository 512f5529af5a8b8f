use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};
use serde_json::json;

use repairdesk_core::TechnicianId;
use repairdesk_infra::RepairShop;
use repairdesk_parties::TechnicianDetails;

use crate::app::{dto, errors};
use crate::app::routes::common::{respond, respond_created, respond_deleted, respond_list};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route("/:id", get(get_technician).put(update_technician).delete(delete_technician))
        .route("/:id/workload", get(technician_workload))
}

pub async fn list_technicians(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.list_technicians().await)
}

pub async fn create_technician(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<TechnicianDetails>,
) -> axum::response::Response {
    respond_created(shop.create_technician(body).await)
}

pub async fn get_technician(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TechnicianId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_technician(&id).await)
}

pub async fn update_technician(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<TechnicianDetails>,
) -> axum::response::Response {
    let id: TechnicianId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.update_technician(&id, body).await)
}

pub async fn delete_technician(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TechnicianId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_technician(&id).await)
}

/// Jobs currently on the technician's bench (in progress or awaiting parts).
pub async fn technician_workload(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TechnicianId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match shop.technician_workload(&id).await {
        Ok(active_jobs) => dto::ok(json!({
            "technicianId": id.as_str(),
            "activeJobs": active_jobs,
        })),
        Err(e) => errors::service_error_to_response(e),
    }
}
