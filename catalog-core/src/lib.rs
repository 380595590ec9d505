pub mod catalog;
pub mod config;
pub mod decorate;
pub mod error;
pub mod items;
pub mod listing;
pub mod models;
pub mod references;
pub mod store;

// Re-export commonly used types
pub use catalog::{Catalog, LoadReport};
pub use config::{determine_data_dir, get_config_path, CatalogConfig, StorePaths};
pub use decorate::{decorate, resolve, Choice, Prompter, Resolution};
pub use error::{CatalogError, DecorateError, StoreError};
pub use items::{DanglingReference, ItemLoadReport, ItemStore};
pub use models::{
    parse_iso_date, Author, AuthorDraft, Book, CatalogItem, CoverState, EntityId, Game, Genre,
    GenreDraft, ItemReferences, Label, LabelDraft, Movie, MusicAlbum, ReferenceEntity,
};
pub use references::{ReferenceStore, ReferenceStores};
pub use store::{JsonLinesStore, Loaded, SkippedLine};
