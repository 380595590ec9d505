//! Catalog item stores
//!
//! Items are written with the ids of their references, never the referenced
//! records themselves. On load each id is checked against the reference
//! collections; ids that no longer resolve are dropped from the item instead
//! of failing the load.

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::error::StoreError;
use crate::models::{CatalogItem, EntityId, ItemReferences};
use crate::references::ReferenceStores;
use crate::store::JsonLinesStore;

/// A stored reference id that did not resolve while loading an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub kind: &'static str,
    pub id: EntityId,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Drops every reference that is not present in `stores`
///
/// Returns the references that were removed.
pub fn resolve_references(
    references: &mut ItemReferences,
    stores: &ReferenceStores,
) -> Vec<DanglingReference> {
    let mut dangling = Vec::new();

    references.author_ids.retain(|&id| {
        let found = stores.authors.contains(id);
        if !found {
            dangling.push(DanglingReference { kind: "author", id });
        }
        found
    });

    if let Some(id) = references.genre_id {
        if !stores.genres.contains(id) {
            dangling.push(DanglingReference { kind: "genre", id });
            references.genre_id = None;
        }
    }

    if let Some(id) = references.label_id {
        if !stores.labels.contains(id) {
            dangling.push(DanglingReference { kind: "label", id });
            references.label_id = None;
        }
    }

    dangling
}

/// What happened while loading one item store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLoadReport {
    pub skipped_records: usize,
    pub dangling_references: usize,
}

/// The items of one type plus the file they are persisted to
#[derive(Debug)]
pub struct ItemStore<T> {
    store: JsonLinesStore<T>,
    items: Vec<T>,
}

impl<T: CatalogItem> ItemStore<T> {
    /// Loads the items stored at `path`, resolving their references
    ///
    /// The reference collections must already be loaded.
    pub fn open<P: AsRef<Path>>(
        path: P,
        references: &ReferenceStores,
    ) -> Result<(Self, ItemLoadReport), StoreError> {
        let store: JsonLinesStore<T> = JsonLinesStore::new(path, T::KIND);
        let loaded = store.load()?;

        let mut report = ItemLoadReport {
            skipped_records: loaded.skipped.len(),
            ..Default::default()
        };

        let mut items = loaded.records;
        for (index, item) in items.iter_mut().enumerate() {
            let dangling = resolve_references(item.references_mut(), references);
            for reference in &dangling {
                warn!(
                    "{} #{} in {} references missing {}, loading it without that reference",
                    T::KIND,
                    index + 1,
                    store.path().display(),
                    reference
                );
            }
            report.dangling_references += dangling.len();
        }

        Ok((Self { store, items }, report))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Adds an item to the collection and appends it to the file
    ///
    /// The item stays in memory even when the append fails.
    pub fn save(&mut self, item: T) -> Result<(), StoreError> {
        debug!("Saving {} published {}", T::KIND, item.publish_date());
        let result = self.store.append(&item);
        self.items.push(item);
        result
    }
}
