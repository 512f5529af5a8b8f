use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    routing::{get, post},
    Json, Router,
};

use repairdesk_core::RepairJobId;
use repairdesk_infra::RepairShop;
use repairdesk_repairs::{NewRepairJob, RepairJobPatch};

use crate::app::{dto, errors};
use crate::app::routes::common::{respond, respond_created, respond_deleted, respond_list};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/:id/status", post(change_status))
}

/// `?status=&technician_id=&customer_id=&q=`
pub async fn list_jobs(
    Extension(shop): Extension<Arc<RepairShop>>,
    Query(query): Query<dto::JobQuery>,
) -> axum::response::Response {
    let filter = match query.into_filter() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    respond_list(shop.list_jobs(&filter).await)
}

pub async fn create_job(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<NewRepairJob>,
) -> axum::response::Response {
    respond_created(shop.create_job(body).await)
}

pub async fn get_job(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RepairJobId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_job(&id).await)
}

pub async fn update_job(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<RepairJobPatch>,
) -> axum::response::Response {
    let id: RepairJobId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.update_job(&id, body).await)
}

pub async fn change_status(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<dto::StatusRequest>,
) -> axum::response::Response {
    let id: RepairJobId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.change_status(&id, body.status).await)
}

pub async fn delete_job(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RepairJobId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_job(&id).await)
}
