use serde::{Deserialize, Serialize};

use repairdesk_core::id::optional_ref;
use repairdesk_core::{
    CategoryId, DomainError, DomainResult, Entity, Money, PartId, SupplierId, require_text,
};

/// Inventory part (a stock-keeping unit the shop installs into devices).
///
/// `stock` is never negative once a part has passed validation. It is changed
/// by direct edits, manual adjustments and job reconciliation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub stock: i64,
    pub price: Money,
    #[serde(
        default,
        deserialize_with = "optional_ref::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<CategoryId>,
    #[serde(
        default,
        deserialize_with = "optional_ref::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier_id: Option<SupplierId>,
}

/// Editable part details (used for both creation and full edits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPart {
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: Money,
    #[serde(default, deserialize_with = "optional_ref::deserialize")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "optional_ref::deserialize")]
    pub supplier_id: Option<SupplierId>,
}

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Add,
    Reduce,
}

/// Manual stock adjustment (goods received, breakage, stock count fixes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub kind: AdjustmentKind,
    pub quantity: i64,
}

impl StockAdjustment {
    pub fn add(quantity: i64) -> Self {
        Self { kind: AdjustmentKind::Add, quantity }
    }

    pub fn reduce(quantity: i64) -> Self {
        Self { kind: AdjustmentKind::Reduce, quantity }
    }

    /// Signed stock change.
    pub fn delta(&self) -> i64 {
        match self.kind {
            AdjustmentKind::Add => self.quantity,
            AdjustmentKind::Reduce => -self.quantity,
        }
    }
}

impl Part {
    pub fn create(id: PartId, details: NewPart) -> DomainResult<Self> {
        let part = Self {
            id,
            name: details.name.trim().to_string(),
            stock: details.stock,
            price: details.price,
            category_id: details.category_id,
            supplier_id: details.supplier_id,
        };
        part.validate()?;
        Ok(part)
    }

    /// Replace all editable details, keeping the identity.
    pub fn with_details(&self, details: NewPart) -> DomainResult<Self> {
        Self::create(self.id.clone(), details)
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("part name", &self.name)?;
        if self.stock < 0 {
            return Err(DomainError::invariant(format!(
                "stock of part {} cannot be negative",
                self.id
            )));
        }
        Ok(())
    }

    /// Decide the stock level after a manual adjustment.
    pub fn adjusted_stock(&self, adjustment: StockAdjustment) -> DomainResult<i64> {
        if adjustment.quantity <= 0 {
            return Err(DomainError::validation("adjustment quantity must be greater than zero"));
        }

        let new_stock = self.stock.checked_add(adjustment.delta()).ok_or_else(|| {
            DomainError::validation(format!(
                "cannot add {} to {}: stock level out of range",
                adjustment.quantity, self.name
            ))
        })?;
        if new_stock < 0 {
            return Err(DomainError::invariant(format!(
                "cannot reduce {} by {}: only {} in stock",
                self.name, adjustment.quantity, self.stock
            )));
        }
        Ok(new_stock)
    }

    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str, stock: i64) -> NewPart {
        NewPart {
            name: name.to_string(),
            stock,
            price: Money::new(2500),
            category_id: None,
            supplier_id: None,
        }
    }

    fn screen() -> Part {
        Part::create("P001".parse().unwrap(), details("iPhone 13 Screen", 5)).unwrap()
    }

    #[test]
    fn create_trims_name_and_keeps_references() {
        let mut d = details("  SSD 512GB  ", 8);
        d.category_id = Some("CAT1".parse().unwrap());
        let part = Part::create("P005".parse().unwrap(), d).unwrap();
        assert_eq!(part.name, "SSD 512GB");
        assert_eq!(part.category_id.as_ref().map(|c| c.as_str()), Some("CAT1"));
        assert_eq!(part.supplier_id, None);
    }

    #[test]
    fn adjustment_past_the_stock_limit_is_rejected() {
        let part = screen();
        let err = part.adjusted_stock(StockAdjustment::add(i64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("out of range")));
        assert_eq!(part.adjusted_stock(StockAdjustment::add(i64::MAX - 5)).unwrap(), i64::MAX);
    }

    #[test]
    fn create_rejects_empty_name_and_negative_stock() {
        let err = Part::create(PartId::new(), details(" ", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Part::create(PartId::new(), details("RAM", -1)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn adjustment_adds_and_reduces() {
        let part = screen();
        assert_eq!(part.adjusted_stock(StockAdjustment::add(3)).unwrap(), 8);
        assert_eq!(part.adjusted_stock(StockAdjustment::reduce(5)).unwrap(), 0);
    }

    #[test]
    fn adjustment_rejects_non_positive_quantity() {
        let part = screen();
        for q in [0, -2] {
            let err = part.adjusted_stock(StockAdjustment::add(q)).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn adjustment_cannot_drive_stock_negative() {
        let err = screen().adjusted_stock(StockAdjustment::reduce(6)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let part = screen();
        assert!(!part.is_low_stock(5));
        assert!(part.is_low_stock(6));
    }

    #[test]
    fn deserializes_legacy_document_with_blank_references() {
        let json = r#"{"id":"P002","name":"MacBook Battery","stock":3,"price":3500,"categoryId":""}"#;
        let part: Part = serde_json::from_str(json).unwrap();
        assert_eq!(part.category_id, None);
        assert_eq!(part.price, Money::new(3500));

        let out = serde_json::to_value(&part).unwrap();
        assert!(out.get("categoryId").is_none());
    }
}
