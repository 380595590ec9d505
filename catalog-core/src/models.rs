use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a reference entity, unique within its own type
pub type EntityId = u32;

/// Format used for every date the catalog stores or accepts
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    // chrono accepts unpadded fields and signed years, the stored format does not
    if !has_iso_date_shape(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

fn has_iso_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// A shared record that catalog items point to by id
pub trait ReferenceEntity: Clone + fmt::Display + Serialize + DeserializeOwned {
    /// Fields collected from the user when a new entity is created
    type Draft;

    /// Singular, lowercase name used in prompts and log lines
    const KIND: &'static str;

    /// Plural name used by listings
    const PLURAL: &'static str;

    fn id(&self) -> EntityId;

    /// Builds the entity from a draft once its id has been assigned
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;
}

/// Represents an author (or artist, developer, director) of a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl ReferenceEntity for Author {
    type Draft = AuthorDraft;
    const KIND: &'static str = "author";
    const PLURAL: &'static str = "authors";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: AuthorDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
        }
    }
}

/// Represents a genre such as "Rock" or "Science fiction"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDraft {
    pub name: String,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl ReferenceEntity for Genre {
    type Draft = GenreDraft;
    const KIND: &'static str = "genre";
    const PLURAL: &'static str = "genres";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: GenreDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }
}

/// Represents a label, e.g. "Gift" in red
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub id: EntityId,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDraft {
    pub title: String,
    pub color: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.color)
    }
}

impl ReferenceEntity for Label {
    type Draft = LabelDraft;
    const KIND: &'static str = "label";
    const PLURAL: &'static str = "labels";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: LabelDraft) -> Self {
        Self {
            id,
            title: draft.title,
            color: draft.color,
        }
    }
}

/// Ids of the reference entities attached to a catalog item
///
/// Stored flattened into each item record as `author_ids`, `genre_id` and
/// `label_id`. Missing fields load as "no reference".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemReferences {
    #[serde(default)]
    pub author_ids: Vec<EntityId>,
    #[serde(default)]
    pub genre_id: Option<EntityId>,
    #[serde(default)]
    pub label_id: Option<EntityId>,
}

impl ItemReferences {
    /// Attaches an author, ignoring ids that are already attached
    pub fn attach_author(&mut self, id: EntityId) {
        if !self.author_ids.contains(&id) {
            self.author_ids.push(id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author_ids.is_empty() && self.genre_id.is_none() && self.label_id.is_none()
    }
}

/// An item of the catalog that can be decorated and persisted
pub trait CatalogItem: Clone + Serialize + DeserializeOwned {
    /// Singular name used in log lines
    const KIND: &'static str;

    /// Plural name used by listings
    const PLURAL: &'static str;

    fn publish_date(&self) -> NaiveDate;

    fn references(&self) -> &ItemReferences;

    fn references_mut(&mut self) -> &mut ItemReferences;

    /// One-line description of the item's own fields
    fn details(&self) -> String;
}

/// Physical state of a book's cover
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoverState {
    Good,
    Bad,
}

impl fmt::Display for CoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverState::Good => write!(f, "good"),
            CoverState::Bad => write!(f, "bad"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub publisher: String,
    pub cover_state: CoverState,
    pub publish_date: NaiveDate,
    #[serde(flatten)]
    pub references: ItemReferences,
}

impl Book {
    pub fn new(publisher: String, cover_state: CoverState, publish_date: NaiveDate) -> Self {
        Self {
            publisher,
            cover_state,
            publish_date,
            references: ItemReferences::default(),
        }
    }
}

impl CatalogItem for Book {
    const KIND: &'static str = "book";
    const PLURAL: &'static str = "books";

    fn publish_date(&self) -> NaiveDate {
        self.publish_date
    }

    fn references(&self) -> &ItemReferences {
        &self.references
    }

    fn references_mut(&mut self) -> &mut ItemReferences {
        &mut self.references
    }

    fn details(&self) -> String {
        format!(
            "Publisher: {}, Cover state: {}, Published: {}",
            self.publisher, self.cover_state, self.publish_date
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MusicAlbum {
    pub publish_date: NaiveDate,
    #[serde(default)]
    pub on_spotify: bool,
    #[serde(flatten)]
    pub references: ItemReferences,
}

impl MusicAlbum {
    pub fn new(publish_date: NaiveDate, on_spotify: bool) -> Self {
        Self {
            publish_date,
            on_spotify,
            references: ItemReferences::default(),
        }
    }
}

impl CatalogItem for MusicAlbum {
    const KIND: &'static str = "music album";
    const PLURAL: &'static str = "music albums";

    fn publish_date(&self) -> NaiveDate {
        self.publish_date
    }

    fn references(&self) -> &ItemReferences {
        &self.references
    }

    fn references_mut(&mut self) -> &mut ItemReferences {
        &mut self.references
    }

    fn details(&self) -> String {
        format!(
            "Published: {}, On Spotify: {}",
            self.publish_date,
            yes_no(self.on_spotify)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub publish_date: NaiveDate,
    pub multiplayer: bool,
    pub last_played_at: NaiveDate,
    #[serde(default)]
    pub archived: bool,
    #[serde(flatten)]
    pub references: ItemReferences,
}

impl Game {
    pub fn new(publish_date: NaiveDate, multiplayer: bool, last_played_at: NaiveDate) -> Self {
        Self {
            publish_date,
            multiplayer,
            last_played_at,
            archived: false,
            references: ItemReferences::default(),
        }
    }
}

impl CatalogItem for Game {
    const KIND: &'static str = "game";
    const PLURAL: &'static str = "games";

    fn publish_date(&self) -> NaiveDate {
        self.publish_date
    }

    fn references(&self) -> &ItemReferences {
        &self.references
    }

    fn references_mut(&mut self) -> &mut ItemReferences {
        &mut self.references
    }

    fn details(&self) -> String {
        format!(
            "Published: {}, Multiplayer: {}, Last played at: {}",
            self.publish_date,
            yes_no(self.multiplayer),
            self.last_played_at
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub publish_date: NaiveDate,
    #[serde(default)]
    pub silent: bool,
    #[serde(flatten)]
    pub references: ItemReferences,
}

impl Movie {
    pub fn new(publish_date: NaiveDate, silent: bool) -> Self {
        Self {
            publish_date,
            silent,
            references: ItemReferences::default(),
        }
    }
}

impl CatalogItem for Movie {
    const KIND: &'static str = "movie";
    const PLURAL: &'static str = "movies";

    fn publish_date(&self) -> NaiveDate {
        self.publish_date
    }

    fn references(&self) -> &ItemReferences {
        &self.references
    }

    fn references_mut(&mut self) -> &mut ItemReferences {
        &mut self.references
    }

    fn details(&self) -> String {
        format!("Published: {}, Silent: {}", self.publish_date, yes_no(self.silent))
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
