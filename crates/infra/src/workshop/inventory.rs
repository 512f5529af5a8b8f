use repairdesk_core::{CategoryId, DomainError, PartId, SupplierId};
use repairdesk_inventory::{CatalogEntry, NewPart, Part, PartCategory, StockAdjustment, Supplier};

use super::{RepairShop, ServiceError, ServiceResult};
use crate::repository::Document;

impl RepairShop {
    pub async fn list_parts(&self) -> ServiceResult<Vec<Part>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_part(&self, id: &PartId) -> ServiceResult<Part> {
        self.require("part", id.as_str()).await
    }

    /// Parts whose stock is below the configured low-stock threshold.
    pub async fn low_stock_parts(&self) -> ServiceResult<Vec<Part>> {
        let parts: Vec<Part> = self.repo.list().await?;
        Ok(parts
            .into_iter()
            .filter(|p| p.is_low_stock(self.low_stock_threshold))
            .collect())
    }

    pub async fn create_part(&self, details: NewPart) -> ServiceResult<Part> {
        let part = Part::create(PartId::new(), details)?;

        let _guard = self.write_lock.lock().await;
        self.repo.create(&part).await?;
        self.parts.put(part.clone()).await;

        tracing::info!(part_id = %part.id, stock = part.stock, "part created");
        Ok(part)
    }

    /// Replace a part's details, including a direct stock edit.
    pub async fn update_part(&self, id: &PartId, details: NewPart) -> ServiceResult<Part> {
        let _guard = self.write_lock.lock().await;
        let current: Part = self.require("part", id.as_str()).await?;
        let updated = current.with_details(details)?;

        self.repo.save(&updated).await?;
        self.parts.put(updated.clone()).await;

        if updated.stock != current.stock {
            tracing::info!(part_id = %id, from = current.stock, to = updated.stock, "part stock edited");
        }
        Ok(updated)
    }

    /// Jobs that still reference the part keep their lines; reconciliation
    /// skips parts that no longer exist.
    pub async fn delete_part(&self, id: &PartId) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        self.require::<Part>("part", id.as_str()).await?;
        self.repo.delete::<Part>(id.as_str()).await?;
        self.parts.remove(id).await;

        tracing::info!(part_id = %id, "part deleted");
        Ok(())
    }

    /// Manual stock movement (goods received, breakage, counts).
    pub async fn adjust_stock(&self, id: &PartId, adjustment: StockAdjustment) -> ServiceResult<Part> {
        let _guard = self.write_lock.lock().await;
        let mut part: Part = self.require("part", id.as_str()).await?;
        let previous = part.stock;
        part.stock = part.adjusted_stock(adjustment)?;

        self.repo.save(&part).await?;
        self.parts.put(part.clone()).await;

        tracing::info!(
            part_id = %id,
            kind = ?adjustment.kind,
            quantity = adjustment.quantity,
            from = previous,
            to = part.stock,
            "stock adjusted"
        );
        Ok(part)
    }

    pub async fn list_categories(&self) -> ServiceResult<Vec<PartCategory>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_category(&self, id: &CategoryId) -> ServiceResult<PartCategory> {
        self.require(PartCategory::KIND, id.as_str()).await
    }

    pub async fn create_category(&self, name: &str) -> ServiceResult<PartCategory> {
        self.create_entry(PartCategory::create(CategoryId::new(), name)?).await
    }

    pub async fn rename_category(&self, id: &CategoryId, name: &str) -> ServiceResult<PartCategory> {
        self.rename_entry(id.as_str(), name).await
    }

    pub async fn delete_category(&self, id: &CategoryId) -> ServiceResult<()> {
        self.delete_entry::<PartCategory>(id.as_str()).await
    }

    pub async fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_supplier(&self, id: &SupplierId) -> ServiceResult<Supplier> {
        self.require(Supplier::KIND, id.as_str()).await
    }

    pub async fn create_supplier(&self, name: &str) -> ServiceResult<Supplier> {
        self.create_entry(Supplier::create(SupplierId::new(), name)?).await
    }

    pub async fn rename_supplier(&self, id: &SupplierId, name: &str) -> ServiceResult<Supplier> {
        self.rename_entry(id.as_str(), name).await
    }

    pub async fn delete_supplier(&self, id: &SupplierId) -> ServiceResult<()> {
        self.delete_entry::<Supplier>(id.as_str()).await
    }

    async fn create_entry<E>(&self, entry: E) -> ServiceResult<E>
    where
        E: CatalogEntry + Document,
    {
        let _guard = self.write_lock.lock().await;
        self.ensure_unique_name(&entry).await?;
        self.repo.create(&entry).await?;
        Ok(entry)
    }

    async fn rename_entry<E>(&self, id: &str, name: &str) -> ServiceResult<E>
    where
        E: CatalogEntry + Document,
    {
        let _guard = self.write_lock.lock().await;
        let current: E = self.require(E::KIND, id).await?;
        let renamed = current.renamed(name)?;
        self.ensure_unique_name(&renamed).await?;
        self.repo.save(&renamed).await?;
        Ok(renamed)
    }

    /// Names are unique per kind, ignoring case.
    async fn ensure_unique_name<E>(&self, entry: &E) -> ServiceResult<()>
    where
        E: CatalogEntry + Document,
    {
        let existing: Vec<E> = self.repo.list().await?;
        let taken = existing
            .iter()
            .any(|e| e.id() != entry.id() && e.name().eq_ignore_ascii_case(entry.name()));
        if taken {
            return Err(DomainError::conflict(format!("{} '{}' already exists", E::KIND, entry.name())).into());
        }
        Ok(())
    }

    /// Refused while any part still points at the entry.
    async fn delete_entry<E>(&self, id: &str) -> ServiceResult<()>
    where
        E: CatalogEntry + Document,
    {
        let _guard = self.write_lock.lock().await;
        let entry: E = self.require(E::KIND, id).await?;
        let parts: Vec<Part> = self.repo.list().await?;

        let in_use = entry.usage_count(&parts);
        if in_use > 0 {
            return Err(ServiceError::InUse { kind: E::KIND, id: id.to_string(), parts: in_use });
        }

        self.repo.delete::<E>(id).await?;
        tracing::info!(kind = E::KIND, id, "catalog entry deleted");
        Ok(())
    }
}
