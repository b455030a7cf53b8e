//! Vendor directory: create, read, update and delete vendors.

use common::VendorId;

use crate::error::Result;
use crate::events::{EventPublisher, PurchasingEvent};
use crate::query::{VendorQuery, filter};
use crate::store::InMemoryStore;
use crate::vendor::{NewVendor, Vendor, VendorPatch};

/// Service owning every vendor mutation.
///
/// Vendors may be deleted while purchase orders still reference them; those
/// orders then show the "Unknown Vendor" placeholder when expanded.
pub struct VendorDirectory<P: EventPublisher> {
    store: InMemoryStore,
    publisher: P,
}

impl<P: EventPublisher> VendorDirectory<P> {
    pub fn new(store: InMemoryStore, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Registers a vendor under the next unused id.
    #[tracing::instrument(skip(self, new_vendor), fields(name = %new_vendor.name))]
    pub async fn create_vendor(&self, new_vendor: NewVendor) -> Result<Vendor> {
        let mut vendors = self.store.vendors.write().await;

        let id = VendorId::new(vendors.issued() + 1);
        let vendor = new_vendor.into_vendor(id)?;
        vendors.insert(vendor.clone())?;

        self.publisher
            .publish(&PurchasingEvent::vendor_registered(&vendor))
            .await;
        metrics::counter!("vendors_created").increment(1);

        Ok(vendor)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_vendor(&self, id: VendorId) -> Result<Vendor> {
        self.store.vendors.get(&id).await
    }

    /// Lists vendors matching the query, in registration order.
    #[tracing::instrument(skip(self))]
    pub async fn list_vendors(&self, query: &VendorQuery) -> Vec<Vendor> {
        let vendors = self.store.vendors.read().await;
        filter(vendors.rows(), query)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_vendor(&self, id: VendorId, patch: VendorPatch) -> Result<Vendor> {
        let mut vendors = self.store.vendors.write().await;
        let (before, after) = vendors.update(&id, patch)?;

        if before.status != after.status {
            self.publisher
                .publish(&PurchasingEvent::vendor_status_changed(
                    id,
                    before.status,
                    after.status,
                ))
                .await;
        }

        Ok(after)
    }

    /// Deletes a vendor and returns it as it was.
    #[tracing::instrument(skip(self))]
    pub async fn delete_vendor(&self, id: VendorId) -> Result<Vendor> {
        let mut vendors = self.store.vendors.write().await;
        let removed = vendors.remove(&id)?;

        self.publisher
            .publish(&PurchasingEvent::vendor_removed(&removed))
            .await;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::events::RecordingPublisher;
    use crate::vendor::VendorStatus;

    fn directory() -> (VendorDirectory<RecordingPublisher>, RecordingPublisher) {
        let publisher = RecordingPublisher::new();
        (
            VendorDirectory::new(InMemoryStore::new(), publisher.clone()),
            publisher,
        )
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let (directory, _) = directory();

        let a = directory.create_vendor(NewVendor::named("A")).await.unwrap();
        let b = directory.create_vendor(NewVendor::named("B")).await.unwrap();

        assert_eq!(a.id, VendorId::new(1));
        assert_eq!(b.id, VendorId::new(2));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (directory, _) = directory();

        directory.create_vendor(NewVendor::named("A")).await.unwrap();
        let b = directory.create_vendor(NewVendor::named("B")).await.unwrap();
        directory.delete_vendor(b.id).await.unwrap();

        let c = directory.create_vendor(NewVendor::named("C")).await.unwrap();
        assert_eq!(c.id, VendorId::new(3));
    }

    #[tokio::test]
    async fn test_invalid_vendor_not_stored() {
        let (directory, publisher) = directory();

        let err = directory.create_vendor(NewVendor::named("")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(directory.list_vendors(&VendorQuery::new()).await.is_empty());
        assert!(publisher.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_status_change_is_published() {
        let (directory, publisher) = directory();
        let vendor = directory.create_vendor(NewVendor::named("A")).await.unwrap();

        let updated = directory
            .update_vendor(vendor.id, VendorPatch::status(VendorStatus::Inactive))
            .await
            .unwrap();
        assert_eq!(updated.status, VendorStatus::Inactive);

        let events = publisher.events().await;
        assert_eq!(
            events.last(),
            Some(&PurchasingEvent::vendor_status_changed(
                vendor.id,
                VendorStatus::Active,
                VendorStatus::Inactive
            ))
        );
    }

    #[tokio::test]
    async fn test_get_missing_vendor() {
        let (directory, _) = directory();
        let err = directory.get_vendor(VendorId::new(7)).await.unwrap_err();
        assert_eq!(err, DomainError::not_found("Vendor", 7));
    }
}
