use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};

use repairdesk_core::CustomerId;
use repairdesk_infra::RepairShop;
use repairdesk_parties::CustomerDetails;

use crate::app::dto;
use crate::app::routes::common::{respond, respond_created, respond_deleted, respond_list};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

pub async fn list_customers(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond_list(shop.list_customers().await)
}

pub async fn create_customer(
    Extension(shop): Extension<Arc<RepairShop>>,
    Json(body): Json<CustomerDetails>,
) -> axum::response::Response {
    respond_created(shop.create_customer(body).await)
}

pub async fn get_customer(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.get_customer(&id).await)
}

pub async fn update_customer(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
    Json(body): Json<CustomerDetails>,
) -> axum::response::Response {
    let id: CustomerId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(shop.update_customer(&id, body).await)
}

pub async fn delete_customer(
    Extension(shop): Extension<Arc<RepairShop>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond_deleted(shop.delete_customer(&id).await)
}
