use std::sync::Arc;

use axum::extract::Extension;

use repairdesk_infra::RepairShop;

use crate::app::routes::common::respond;

pub async fn dashboard(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond(shop.dashboard().await)
}

pub async fn monitor(Extension(shop): Extension<Arc<RepairShop>>) -> axum::response::Response {
    respond(shop.monitor_board().await)
}
