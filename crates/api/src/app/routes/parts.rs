use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::{get, post},
    Json, Router,
};

use repairdesk_core::PartId;
use repairdesk_infra::RepairShop;
use repairdesk_inventory::{NewPart, StockAdjustment};

use crate::app::dto;
use crate::app::routes::common::{respond, respond_created, respond_deleted, respond_list};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/low-stock", get(low_stock_parts))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/:id/adjust", post(adjust_stock))
}

pub async fn list_parts(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.list_parts().await)
}

pub async fn low_stock_parts(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.low_stock_parts().await)
}

pub async fn create_part(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<NewPart>,
) -> axum::response::Response {
    respond_created(shop.create_part(body).await)
}

pub async fn get_part(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PartId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_part(&id).await)
}

pub async fn update_part(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<NewPart>,
) -> axum::response::Response {
    let id: PartId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.update_part(&id, body).await)
}

pub async fn delete_part(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PartId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_part(&id).await)
}

/// Body: `{"kind": "add" | "reduce", "quantity": n}`.
pub async fn adjust_stock(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<StockAdjustment>,
) -> axum::response::Response {
    let id: PartId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.adjust_stock(&id, body).await)
}
