//! Attaching authors, genres and labels to a new catalog item
//!
//! Decoration is split in two. [`resolve`] is a pure decision: given what the
//! user picked and the existing collection, it answers either "this existing
//! id" or "this new entity, with its id already assigned". [`decorate`] then
//! performs the effects: the new entity is added to its collection and
//! appended to its store before its id is attached to the item.

use log::debug;

use crate::error::DecorateError;
use crate::models::{
    Author, AuthorDraft, EntityId, Genre, GenreDraft, ItemReferences, Label, LabelDraft,
    ReferenceEntity,
};
use crate::references::{next_id, ReferenceStore, ReferenceStores};

/// A selection made by the user for one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<D> {
    /// Reuse an entity that already exists
    Existing(EntityId),
    /// Create a new entity from the collected fields
    New(D),
}

/// The interaction layer the decoration engine asks for selections
///
/// Implementations only hand back validated selections: an `Existing` id must
/// come from the slice they were shown.
pub trait Prompter {
    /// Zero or more authors for the item
    fn choose_authors(&mut self, existing: &[Author]) -> anyhow::Result<Vec<Choice<AuthorDraft>>>;

    /// At most one genre for the item
    fn choose_genre(&mut self, existing: &[Genre]) -> anyhow::Result<Option<Choice<GenreDraft>>>;

    /// At most one label for the item
    fn choose_label(&mut self, existing: &[Label]) -> anyhow::Result<Option<Choice<LabelDraft>>>;
}

/// Outcome of resolving a single choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<E> {
    Existing(EntityId),
    Create(E),
}

/// Turns a choice into an existing id or a fully built new entity
pub fn resolve<E: ReferenceEntity>(
    choice: Choice<E::Draft>,
    existing: &[E],
) -> Result<Resolution<E>, DecorateError> {
    match choice {
        Choice::Existing(id) => {
            if existing.iter().any(|e| e.id() == id) {
                Ok(Resolution::Existing(id))
            } else {
                Err(DecorateError::UnknownReference { kind: E::KIND, id })
            }
        }
        Choice::New(draft) => Ok(Resolution::Create(E::from_draft(next_id(existing), draft))),
    }
}

/// Resolves a choice against `store`, persisting a new entity if needed
fn apply<E: ReferenceEntity>(
    choice: Choice<E::Draft>,
    store: &mut ReferenceStore<E>,
) -> Result<EntityId, DecorateError> {
    match resolve(choice, store.entities())? {
        Resolution::Existing(id) => Ok(id),
        Resolution::Create(entity) => {
            let id = entity.id();
            store.insert(entity)?;
            Ok(id)
        }
    }
}

/// Asks `prompter` for the item's authors, genre and label and attaches them
///
/// Choices are applied one at a time, so a failure leaves every entity
/// created so far in its collection. References already on the item are
/// kept; a new genre or label replaces the previous one.
pub fn decorate<P: Prompter + ?Sized>(
    references: &mut ItemReferences,
    stores: &mut ReferenceStores,
    prompter: &mut P,
) -> Result<(), DecorateError> {
    let authors = prompter.choose_authors(stores.authors.entities())?;
    for choice in authors {
        let id = apply(choice, &mut stores.authors)?;
        references.attach_author(id);
    }

    if let Some(choice) = prompter.choose_genre(stores.genres.entities())? {
        references.genre_id = Some(apply(choice, &mut stores.genres)?);
    }

    if let Some(choice) = prompter.choose_label(stores.labels.entities())? {
        references.label_id = Some(apply(choice, &mut stores.labels)?);
    }

    debug!(
        "Decorated item with {} author(s), genre {:?}, label {:?}",
        references.author_ids.len(),
        references.genre_id,
        references.label_id
    );

    Ok(())
}
