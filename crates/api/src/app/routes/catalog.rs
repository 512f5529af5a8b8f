//! Part categories and suppliers. Both are plain named entries; deletes are
//! refused while a part still references them.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};

use repairdesk_core::{CategoryId, SupplierId};
use repairdesk_infra::RepairShop;

use crate::app::dto;
use crate::app::routes::common::{respond, respond_created, respond_deleted, respond_list};

pub fn categories_router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", get(get_category).put(rename_category).delete(delete_category))
}

pub fn suppliers_router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", get(get_supplier).put(rename_supplier).delete(delete_supplier))
}

pub async fn list_categories(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.list_categories().await)
}

pub async fn create_category(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<dto::NameRequest>,
) -> axum::response::Response {
    respond_created(shop.create_category(&body.name).await)
}

pub async fn get_category(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_category(&id).await)
}

pub async fn rename_category(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<dto::NameRequest>,
) -> axum::response::Response {
    let id: CategoryId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.rename_category(&id, &body.name).await)
}

pub async fn delete_category(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_category(&id).await)
}

pub async fn list_suppliers(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.list_suppliers().await)
}

pub async fn create_supplier(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<dto::NameRequest>,
) -> axum::response::Response {
    respond_created(shop.create_supplier(&body.name).await)
}

pub async fn get_supplier(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_supplier(&id).await)
}

pub async fn rename_supplier(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<dto::NameRequest>,
) -> axum::response::Response {
    let id: SupplierId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.rename_supplier(&id, &body.name).await)
}

pub async fn delete_supplier(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_supplier(&id).await)
}
