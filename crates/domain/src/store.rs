//! In-memory entity store.
//!
//! Each entity kind lives in its own [`Collection`], an insertion-ordered
//! table behind a `tokio` read/write lock. Writers to one collection are
//! serialized; readers get owned copies and never block each other.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::CatalogItem;
use crate::error::{DomainError, Result};
use crate::purchase_order::PurchaseOrder;
use crate::vendor::Vendor;

/// An entity that can be stored in a [`Collection`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier type, unique within a collection.
    type Id: Clone + PartialEq + std::fmt::Display + Send + Sync;

    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    /// Sequence number embedded in the identifier, if it carries one.
    ///
    /// Inserting an entity with a sequence advances the collection's
    /// counter to it, so later allocations never collide.
    fn sequence(&self) -> Option<u64> {
        None
    }
}

/// A partial update for an entity.
///
/// Implementations list exactly which fields may change. A patch that
/// returns an error must leave the entity as it found it; [`Table::update`]
/// guarantees this by patching a copy.
pub trait Patch<E> {
    fn apply_to(self, entity: &mut E) -> Result<()>;
}

/// The rows of a collection plus its sequence counter.
#[derive(Debug)]
pub struct Table<E: Entity> {
    rows: Vec<E>,
    issued: u64,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            issued: 0,
        }
    }
}

impl<E: Entity> Table<E> {
    /// Returns the highest sequence number ever stored in this table.
    ///
    /// The counter only moves forward, so `issued() + 1` is never the
    /// sequence of a deleted entity.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Returns all rows in insertion order.
    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, id: &E::Id) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn get(&self, id: &E::Id) -> Result<&E> {
        self.find(id).ok_or_else(|| DomainError::not_found(E::KIND, id))
    }

    /// Appends an entity, rejecting duplicate identifiers.
    pub fn insert(&mut self, entity: E) -> Result<()> {
        if self.find(entity.id()).is_some() {
            return Err(DomainError::AlreadyExists {
                kind: E::KIND,
                id: entity.id().to_string(),
            });
        }
        if let Some(seq) = entity.sequence() {
            self.issued = self.issued.max(seq);
        }
        self.rows.push(entity);
        Ok(())
    }

    /// Applies a patch and returns the entity before and after the change.
    pub fn update<P: Patch<E>>(&mut self, id: &E::Id, patch: P) -> Result<(E, E)> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| DomainError::not_found(E::KIND, id))?;

        let before = row.clone();
        let mut after = row.clone();
        patch.apply_to(&mut after)?;
        *row = after.clone();

        Ok((before, after))
    }

    /// Removes an entity, keeping the relative order of the rest.
    pub fn remove(&mut self, id: &E::Id) -> Result<E> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| DomainError::not_found(E::KIND, id))?;
        Ok(self.rows.remove(index))
    }
}

/// A shared, lock-protected table of one entity kind.
#[derive(Debug)]
pub struct Collection<E: Entity> {
    table: Arc<RwLock<Table<E>>>,
}

impl<E: Entity> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires shared read access to the table.
    pub async fn read(&self) -> RwLockReadGuard<'_, Table<E>> {
        self.table.read().await
    }

    /// Acquires exclusive write access to the table.
    ///
    /// Services hold this guard across validation, mutation and event
    /// publication so the three happen as one step.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Table<E>> {
        self.table.write().await
    }

    /// Returns a copy of every entity in insertion order.
    pub async fn list(&self) -> Vec<E> {
        self.table.read().await.rows().to_vec()
    }

    pub async fn get(&self, id: &E::Id) -> Result<E> {
        self.table.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &E::Id) -> bool {
        self.table.read().await.find(id).is_some()
    }

    pub async fn insert(&self, entity: E) -> Result<()> {
        self.table.write().await.insert(entity)
    }

    pub async fn update<P: Patch<E>>(&self, id: &E::Id, patch: P) -> Result<(E, E)> {
        self.table.write().await.update(id, patch)
    }

    pub async fn remove(&self, id: &E::Id) -> Result<E> {
        self.table.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }
}

/// All purchasing collections, cloned cheaply into every service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub vendors: Collection<Vendor>,
    pub items: Collection<CatalogItem>,
    pub orders: Collection<PurchaseOrder>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: u64,
        label: String,
    }

    impl Entity for Widget {
        type Id = u64;
        const KIND: &'static str = "Widget";

        fn id(&self) -> &u64 {
            &self.id
        }

        fn sequence(&self) -> Option<u64> {
            Some(self.id)
        }
    }

    struct Relabel(&'static str);

    impl Patch<Widget> for Relabel {
        fn apply_to(self, entity: &mut Widget) -> Result<()> {
            if self.0.is_empty() {
                return Err(DomainError::invalid("label must not be empty"));
            }
            entity.label = self.0.to_string();
            Ok(())
        }
    }

    fn widget(id: u64, label: &str) -> Widget {
        Widget {
            id,
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let widgets = Collection::new();
        widgets.insert(widget(1, "a")).await.unwrap();

        assert_eq!(widgets.get(&1).await.unwrap(), widget(1, "a"));
        assert!(matches!(
            widgets.get(&2).await,
            Err(DomainError::NotFound { kind: "Widget", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let widgets = Collection::new();
        widgets.insert(widget(1, "a")).await.unwrap();

        let err = widgets.insert(widget(1, "b")).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists { .. }));
        assert_eq!(widgets.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order_after_remove() {
        let widgets = Collection::new();
        for (id, label) in [(3, "c"), (1, "a"), (2, "b")] {
            widgets.insert(widget(id, label)).await.unwrap();
        }
        widgets.remove(&1).await.unwrap();

        let ids: Vec<u64> = widgets.list().await.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_sequence_never_reused() {
        let widgets: Collection<Widget> = Collection::new();
        let mut table = widgets.write().await;

        let first = table.issued() + 1;
        table.insert(widget(first, "a")).unwrap();
        table.remove(&first).unwrap();
        let second = table.issued() + 1;

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_insert_advances_sequence() {
        let widgets: Collection<Widget> = Collection::new();
        widgets.insert(widget(5, "seeded")).await.unwrap();

        assert_eq!(widgets.read().await.issued(), 5);
    }

    #[tokio::test]
    async fn test_update_returns_before_and_after() {
        let widgets = Collection::new();
        widgets.insert(widget(1, "old")).await.unwrap();

        let (before, after) = widgets.update(&1, Relabel("new")).await.unwrap();
        assert_eq!(before.label, "old");
        assert_eq!(after.label, "new");
        assert_eq!(widgets.get(&1).await.unwrap().label, "new");
    }

    #[tokio::test]
    async fn test_failed_patch_leaves_entity_untouched() {
        let widgets = Collection::new();
        widgets.insert(widget(1, "keep")).await.unwrap();

        assert!(widgets.update(&1, Relabel("")).await.is_err());
        assert_eq!(widgets.get(&1).await.unwrap().label, "keep");
    }

    #[tokio::test]
    async fn test_update_and_remove_missing() {
        let widgets: Collection<Widget> = Collection::new();
        assert!(matches!(
            widgets.update(&9, Relabel("x")).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            widgets.remove(&9).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
