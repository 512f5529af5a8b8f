use serde::{Deserialize, Serialize};

use repairdesk_core::{CustomerId, DomainResult, Entity, require_text};

/// Optional ways to reach a customer besides the phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Chat handle (LINE id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
}

impl ContactInfo {
    /// Drop blank optional fields so they read as "not provided".
    fn normalized(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        Self {
            email: clean(self.email),
            address: clean(self.address),
            line_id: clean(self.line_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

/// Editable customer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

impl Customer {
    /// Name and phone are required; everything else is optional.
    pub fn register(id: CustomerId, details: CustomerDetails) -> DomainResult<Self> {
        require_text("customer name", &details.name)?;
        require_text("customer phone", &details.phone)?;

        Ok(Self {
            id,
            name: details.name.trim().to_string(),
            phone: details.phone.trim().to_string(),
            contact: details.contact.normalized(),
        })
    }

    pub fn with_details(&self, details: CustomerDetails) -> DomainResult<Self> {
        Self::register(self.id.clone(), details)
    }

    /// Checks a stored or imported record.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("customer name", &self.name)?;
        require_text("customer phone", &self.phone)
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
