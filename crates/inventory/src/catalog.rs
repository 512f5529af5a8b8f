//! Part categories and suppliers: named lookup entries referenced by parts.

use serde::{Deserialize, Serialize};

use repairdesk_core::{CategoryId, DomainResult, Entity, SupplierId, require_text};

use crate::part::Part;

/// Shared behaviour of the named entries parts can reference.
pub trait CatalogEntry: Entity + Clone {
    /// Human-readable kind, used in messages (`"category"`, `"supplier"`).
    const KIND: &'static str;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Whether `part` points at this entry.
    fn is_referenced_by(&self, part: &Part) -> bool;

    /// Return a copy with a new, validated name.
    fn renamed(&self, name: &str) -> DomainResult<Self> {
        require_text(Self::KIND, name)?;
        let mut next = self.clone();
        next.set_name(name.trim().to_string());
        Ok(next)
    }

    /// Number of parts referencing this entry.
    fn usage_count(&self, parts: &[Part]) -> usize {
        parts.iter().filter(|p| self.is_referenced_by(p)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCategory {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
}

impl PartCategory {
    pub fn create(id: CategoryId, name: &str) -> DomainResult<Self> {
        require_text(Self::KIND, name)?;
        Ok(Self { id, name: name.trim().to_string() })
    }
}

impl Supplier {
    pub fn create(id: SupplierId, name: &str) -> DomainResult<Self> {
        require_text(Self::KIND, name)?;
        Ok(Self { id, name: name.trim().to_string() })
    }
}

impl Entity for PartCategory {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CatalogEntry for PartCategory {
    const KIND: &'static str = "category";

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_referenced_by(&self, part: &Part) -> bool {
        part.category_id.as_ref() == Some(&self.id)
    }
}

impl CatalogEntry for Supplier {
    const KIND: &'static str = "supplier";

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_referenced_by(&self, part: &Part) -> bool {
        part.supplier_id.as_ref() == Some(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use repairdesk_core::{DomainError, Money};

    use super::*;
    use crate::part::NewPart;

    fn part(id: &str, category: Option<&str>, supplier: Option<&str>) -> Part {
        Part::create(
            id.parse().unwrap(),
            NewPart {
                name: format!("part {id}"),
                stock: 1,
                price: Money::new(100),
                category_id: category.map(|c| c.parse().unwrap()),
                supplier_id: supplier.map(|s| s.parse().unwrap()),
            },
        )
        .unwrap()
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = PartCategory::create(CategoryId::new(), "  ").unwrap_err();
        assert_eq!(err, DomainError::Validation("category cannot be empty".to_string()));
    }

    #[test]
    fn usage_counts_only_matching_references() {
        let screens = PartCategory::create("CAT1".parse().unwrap(), "Screens").unwrap();
        let acme = Supplier::create("S1".parse().unwrap(), "Acme").unwrap();
        let parts = vec![
            part("P1", Some("CAT1"), Some("S1")),
            part("P2", Some("CAT2"), Some("S1")),
            part("P3", None, None),
        ];

        assert_eq!(screens.usage_count(&parts), 1);
        assert_eq!(acme.usage_count(&parts), 2);
    }

    #[test]
    fn renamed_keeps_identity() {
        let acme = Supplier::create("S1".parse().unwrap(), "Acme").unwrap();
        let renamed = acme.renamed(" Acme Parts ").unwrap();
        assert_eq!(renamed.id, acme.id);
        assert_eq!(renamed.name, "Acme Parts");
        assert!(acme.renamed("").is_err());
    }
}
