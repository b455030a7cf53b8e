//! Vendors: the suppliers purchase orders are placed against.

use common::VendorId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::store::{Entity, Patch};

/// Whether a vendor is currently used for purchasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    #[default]
    Active,
    Inactive,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Active => "active",
            VendorStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(VendorStatus::Active),
            "inactive" => Ok(VendorStatus::Inactive),
            other => Err(DomainError::invalid(format!(
                "unknown vendor status '{other}'"
            ))),
        }
    }
}

/// A supplier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: VendorStatus,
    pub category: String,
}

impl Vendor {
    pub fn is_active(&self) -> bool {
        self.status == VendorStatus::Active
    }
}

impl Entity for Vendor {
    type Id = VendorId;
    const KIND: &'static str = "Vendor";

    fn id(&self) -> &VendorId {
        &self.id
    }

    fn sequence(&self) -> Option<u64> {
        Some(self.id.value())
    }
}

/// Fields supplied when registering a vendor. The id is assigned by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewVendor {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: VendorStatus,
    #[serde(default)]
    pub category: String,
}

impl NewVendor {
    /// Creates a new vendor registration with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn status(mut self, status: VendorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Checks the registration and builds the vendor record.
    pub fn into_vendor(self, id: VendorId) -> Result<Vendor> {
        validate_name(&self.name)?;
        Ok(Vendor {
            id,
            name: self.name.trim().to_string(),
            contact: self.contact,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: self.status,
            category: self.category,
        })
    }
}

/// Partial update for a vendor. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<VendorStatus>,
    pub category: Option<String>,
}

impl VendorPatch {
    pub fn status(status: VendorStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Patch<Vendor> for VendorPatch {
    fn apply_to(self, vendor: &mut Vendor) -> Result<()> {
        if let Some(name) = self.name {
            validate_name(&name)?;
            vendor.name = name.trim().to_string();
        }
        if let Some(contact) = self.contact {
            vendor.contact = contact;
        }
        if let Some(email) = self.email {
            vendor.email = email;
        }
        if let Some(phone) = self.phone {
            vendor.phone = phone;
        }
        if let Some(address) = self.address {
            vendor.address = address;
        }
        if let Some(status) = self.status {
            vendor.status = status;
        }
        if let Some(category) = self.category {
            vendor.category = category;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid("vendor name is required"));
    }
    Ok(())
}
