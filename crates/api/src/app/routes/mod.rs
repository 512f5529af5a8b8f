use axum::{
    routing::{get, post},
    Router,
};

pub mod backup;
pub mod catalog;
pub mod common;
pub mod customers;
pub mod parts;
pub mod repairs;
pub mod reports;
pub mod system;
pub mod technicians;

/// Router for every shop endpoint. The workshop service is provided as an
/// `Extension` layer by the caller.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/customers", customers::router())
        .nest("/technicians", technicians::router())
        .nest("/categories", catalog::categories_router())
        .nest("/suppliers", catalog::suppliers_router())
        .nest("/parts", parts::router())
        .nest("/repairs", repairs::router())
        .route("/dashboard", get(reports::dashboard))
        .route("/monitor", get(reports::monitor))
        .route("/backup", get(backup::export_backup).post(backup::import_backup))
        .route("/seed", post(backup::seed))
}
