use std::sync::Arc;

use anyhow::Context;

use repairdesk_infra::{AppConfig, Datastore, RepairShop, SystemClock};

/// Open the configured store and wrap it in the workshop service, seeding
/// the sample shop when asked to.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<Arc<RepairShop>> {
    let datastore = Datastore::open(&config.store)
        .await
        .context("failed to open document store")?;

    let shop = RepairShop::new(datastore.as_store(), Arc::new(SystemClock), config.low_stock_threshold);

    if config.seed_sample_data {
        let summary = shop
            .seed_sample_data()
            .await
            .context("failed to seed sample data")?;
        tracing::info!(parts = summary.parts, repair_jobs = summary.repair_jobs, "sample data loaded");
    }

    tracing::info!(
        backend = datastore.backend_name(),
        low_stock_threshold = config.low_stock_threshold,
        "workshop service ready"
    );
    Ok(Arc::new(shop))
}
