//! In-memory collections of reference entities backed by their own stores

use std::path::Path;

use log::debug;

use crate::error::StoreError;
use crate::models::{Author, EntityId, Genre, Label, ReferenceEntity};
use crate::store::JsonLinesStore;

/// Returns the id the next created entity receives: one past the highest
/// id in use, or 1 for an empty collection. Ids are never reused.
pub fn next_id<E: ReferenceEntity>(existing: &[E]) -> EntityId {
    existing.iter().map(|e| e.id()).max().map_or(1, |max| max + 1)
}

/// The entities of one type plus the file they are persisted to
#[derive(Debug)]
pub struct ReferenceStore<E> {
    store: JsonLinesStore<E>,
    entities: Vec<E>,
}

impl<E: ReferenceEntity> ReferenceStore<E> {
    /// Loads the entities stored at `path`
    ///
    /// Returns the store together with the number of records that had to be
    /// skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, usize), StoreError> {
        let store = JsonLinesStore::new(path, E::KIND);
        let loaded = store.load()?;
        let skipped = loaded.skipped.len();

        Ok((
            Self {
                store,
                entities: loaded.records,
            },
            skipped,
        ))
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn next_id(&self) -> EntityId {
        next_id(&self.entities)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Adds a new entity to the collection and appends it to the file
    ///
    /// The entity stays in memory even when the append fails, so it is still
    /// visible for the rest of the session.
    pub fn insert(&mut self, entity: E) -> Result<(), StoreError> {
        debug!("Creating {} {} ({})", E::KIND, entity.id(), entity);
        let result = self.store.append(&entity);
        self.entities.push(entity);
        result
    }
}

/// The three shared reference collections catalog items point into
#[derive(Debug)]
pub struct ReferenceStores {
    pub authors: ReferenceStore<Author>,
    pub genres: ReferenceStore<Genre>,
    pub labels: ReferenceStore<Label>,
}

impl ReferenceStores {
    pub fn author(&self, id: EntityId) -> Option<&Author> {
        self.authors.get(id)
    }

    pub fn genre(&self, id: EntityId) -> Option<&Genre> {
        self.genres.get(id)
    }

    pub fn label(&self, id: EntityId) -> Option<&Label> {
        self.labels.get(id)
    }
}
