//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and workshop service wiring
//! - `routes/`: HTTP routes + handlers (one file per shop area)
//! - `dto.rs`: request DTOs and path/query parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use repairdesk_infra::{AppConfig, RepairShop};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from process configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let shop = services::build_services(config).await?;
    Ok(router(shop))
}

/// Router over an already wired workshop service.
pub fn router(shop: Arc<RepairShop>) -> Router {
    routes::router().layer(ServiceBuilder::new().layer(Extension(shop)))
}
