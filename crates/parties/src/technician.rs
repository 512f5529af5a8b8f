use serde::{Deserialize, Serialize};

use repairdesk_core::{DomainResult, Entity, TechnicianId, require_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianDetails {
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}

impl Technician {
    pub fn hire(id: TechnicianId, details: TechnicianDetails) -> DomainResult<Self> {
        require_text("technician name", &details.name)?;
        Ok(Self {
            id,
            name: details.name.trim().to_string(),
            specialty: details.specialty.trim().to_string(),
        })
    }

    pub fn with_details(&self, details: TechnicianDetails) -> DomainResult<Self> {
        Self::hire(self.id.clone(), details)
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("technician name", &self.name)
    }
}

impl Entity for Technician {
    type Id = TechnicianId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
