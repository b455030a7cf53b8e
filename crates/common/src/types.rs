use serde::{Deserialize, Serialize};

/// Unique identifier for a vendor.
///
/// Assigned by the vendor collection from a monotonic sequence, so a
/// deleted vendor's number is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(u64);

impl VendorId {
    /// Creates a vendor ID from its sequence number.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VendorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for VendorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Catalog item identifier (e.g. `item1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the item ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Purchase order number in the form `PO-<year>-<sequence>`.
///
/// The sequence is zero-padded to three digits. Sequences above 999 simply
/// print wider (`PO-2023-1000`); the padding is a minimum, not a limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(String);

impl PurchaseOrderId {
    /// Builds the order number for the given year and sequence.
    pub fn generate(year: i32, sequence: u64) -> Self {
        Self(format!("PO-{year}-{sequence:03}"))
    }

    /// Wraps an existing order number without validating its shape.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the order number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric sequence if the id follows the generated format.
    pub fn sequence(&self) -> Option<u64> {
        let mut parts = self.0.splitn(3, '-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("PO"), Some(year), Some(seq)) if year.parse::<i32>().is_ok() => seq.parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PurchaseOrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PurchaseOrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_id_parses_from_path_segment() {
        let id: VendorId = "42".parse().unwrap();
        assert_eq!(id, VendorId::new(42));
        assert!("abc".parse::<VendorId>().is_err());
    }

    #[test]
    fn vendor_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&VendorId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn order_id_pads_sequence_to_three_digits() {
        assert_eq!(PurchaseOrderId::generate(2023, 1).as_str(), "PO-2023-001");
        assert_eq!(PurchaseOrderId::generate(2023, 11).as_str(), "PO-2023-011");
        assert_eq!(PurchaseOrderId::generate(2023, 1234).as_str(), "PO-2023-1234");
    }

    #[test]
    fn order_id_sequence_is_recovered() {
        assert_eq!(PurchaseOrderId::generate(2024, 17).sequence(), Some(17));
        assert_eq!(PurchaseOrderId::new("legacy-order").sequence(), None);
        assert_eq!(PurchaseOrderId::new("PO-xx-003").sequence(), None);
    }

    #[test]
    fn item_id_string_conversion() {
        let id: ItemId = "item1".into();
        assert_eq!(id.as_str(), "item1");
        assert_eq!(id.to_string(), "item1");
    }
}
