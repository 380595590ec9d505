//! The catalog context: every collection of the program in one place
//!
//! A [`Catalog`] is built once at startup by loading every store, then passed
//! to each menu action. Reference collections are loaded before item
//! collections so item references can be resolved.

use log::info;

use crate::config::StorePaths;
use crate::decorate::{decorate, Prompter};
use crate::error::{CatalogError, StoreError};
use crate::items::{ItemLoadReport, ItemStore};
use crate::listing::{render_entities, render_items};
use crate::models::{Book, CatalogItem, Game, Movie, MusicAlbum};
use crate::references::{ReferenceStore, ReferenceStores};

/// Totals collected while opening the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines skipped because they could not be decoded
    pub skipped_records: usize,
    /// References dropped because their id no longer resolves
    pub dangling_references: usize,
}

impl LoadReport {
    fn add_items(&mut self, report: ItemLoadReport) {
        self.skipped_records += report.skipped_records;
        self.dangling_references += report.dangling_references;
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_records == 0 && self.dangling_references == 0
    }
}

#[derive(Debug)]
pub struct Catalog {
    pub references: ReferenceStores,
    pub books: ItemStore<Book>,
    pub albums: ItemStore<MusicAlbum>,
    pub games: ItemStore<Game>,
    pub movies: ItemStore<Movie>,
}

impl Catalog {
    /// Loads every store
    ///
    /// Missing files are empty stores; unreadable records and dangling
    /// references are counted in the report rather than failing.
    pub fn open(paths: &StorePaths) -> Result<(Self, LoadReport), StoreError> {
        let mut report = LoadReport::default();

        let (authors, skipped) = ReferenceStore::open(&paths.authors)?;
        report.skipped_records += skipped;
        let (genres, skipped) = ReferenceStore::open(&paths.genres)?;
        report.skipped_records += skipped;
        let (labels, skipped) = ReferenceStore::open(&paths.labels)?;
        report.skipped_records += skipped;

        let references = ReferenceStores {
            authors,
            genres,
            labels,
        };

        let (books, items) = ItemStore::open(&paths.books, &references)?;
        report.add_items(items);
        let (albums, items) = ItemStore::open(&paths.music_albums, &references)?;
        report.add_items(items);
        let (games, items) = ItemStore::open(&paths.games, &references)?;
        report.add_items(items);
        let (movies, items) = ItemStore::open(&paths.movies, &references)?;
        report.add_items(items);

        let catalog = Self {
            references,
            books,
            albums,
            games,
            movies,
        };

        info!(
            "Catalog loaded: {} book(s), {} album(s), {} game(s), {} movie(s), {} author(s), {} genre(s), {} label(s)",
            catalog.books.len(),
            catalog.albums.len(),
            catalog.games.len(),
            catalog.movies.len(),
            catalog.references.authors.len(),
            catalog.references.genres.len(),
            catalog.references.labels.len()
        );

        Ok((catalog, report))
    }

    pub fn add_book<P: Prompter + ?Sized>(
        &mut self,
        book: Book,
        prompter: &mut P,
    ) -> Result<(), CatalogError> {
        add_item(&mut self.references, &mut self.books, book, prompter)
    }

    pub fn add_album<P: Prompter + ?Sized>(
        &mut self,
        album: MusicAlbum,
        prompter: &mut P,
    ) -> Result<(), CatalogError> {
        add_item(&mut self.references, &mut self.albums, album, prompter)
    }

    pub fn add_game<P: Prompter + ?Sized>(
        &mut self,
        game: Game,
        prompter: &mut P,
    ) -> Result<(), CatalogError> {
        add_item(&mut self.references, &mut self.games, game, prompter)
    }

    pub fn add_movie<P: Prompter + ?Sized>(
        &mut self,
        movie: Movie,
        prompter: &mut P,
    ) -> Result<(), CatalogError> {
        add_item(&mut self.references, &mut self.movies, movie, prompter)
    }

    pub fn list_books(&self) -> String {
        render_items(self.books.items(), &self.references)
    }

    pub fn list_albums(&self) -> String {
        render_items(self.albums.items(), &self.references)
    }

    pub fn list_games(&self) -> String {
        render_items(self.games.items(), &self.references)
    }

    pub fn list_movies(&self) -> String {
        render_items(self.movies.items(), &self.references)
    }

    pub fn list_authors(&self) -> String {
        render_entities(self.references.authors.entities())
    }

    pub fn list_genres(&self) -> String {
        render_entities(self.references.genres.entities())
    }

    pub fn list_labels(&self) -> String {
        render_entities(self.references.labels.entities())
    }
}

/// Decorates a bare item and saves it to its store
fn add_item<T, P>(
    references: &mut ReferenceStores,
    store: &mut ItemStore<T>,
    mut item: T,
    prompter: &mut P,
) -> Result<(), CatalogError>
where
    T: CatalogItem,
    P: Prompter + ?Sized,
{
    decorate(item.references_mut(), references, prompter)
        .map_err(|source| CatalogError::Decorate {
            kind: T::KIND,
            source,
        })?;

    store.save(item).map_err(|source| CatalogError::Save {
        kind: T::KIND,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::tests::{author_draft, ScriptedPrompter};
    use crate::decorate::Choice;
    use crate::models::{parse_iso_date, Author, CoverState, Genre, GenreDraft, LabelDraft};
    use std::fs;
    use tempfile::TempDir;

    fn open(paths: &StorePaths) -> Catalog {
        let (catalog, report) = Catalog::open(paths).unwrap();
        assert!(report.is_clean());
        catalog
    }

    #[test]
    fn test_empty_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&StorePaths::in_dir(temp_dir.path()));

        assert_eq!(catalog.list_books(), "No books available.\n");
        assert_eq!(catalog.list_authors(), "No authors available.\n");
        assert!(catalog.references.labels.is_empty());
    }

    #[test]
    fn test_album_survives_restart_with_references() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::in_dir(temp_dir.path());

        {
            let mut catalog = open(&paths);
            let mut prompter = ScriptedPrompter {
                authors: vec![Choice::New(author_draft("Ada", "Lovelace"))],
                genre: Some(Choice::New(GenreDraft {
                    name: "Rock".to_string(),
                })),
                ..Default::default()
            };
            let album = MusicAlbum::new(parse_iso_date("2020-05-01").unwrap(), false);
            catalog.add_album(album, &mut prompter).unwrap();
        }

        let catalog = open(&paths);
        assert_eq!(catalog.albums.len(), 1);

        let album = &catalog.albums.items()[0];
        assert_eq!(album.publish_date, parse_iso_date("2020-05-01").unwrap());

        let genre = album.references.genre_id.and_then(|id| catalog.references.genre(id));
        assert_eq!(
            genre,
            Some(&Genre {
                id: 1,
                name: "Rock".to_string()
            })
        );

        let authors: Vec<&Author> = album
            .references
            .author_ids
            .iter()
            .filter_map(|&id| catalog.references.author(id))
            .collect();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].id, 1);
        assert_eq!(authors[0].first_name, "Ada");
        assert_eq!(album.references.label_id, None);
    }

    #[test]
    fn test_ids_continue_across_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::in_dir(temp_dir.path());

        for expected in 1..=3 {
            let mut catalog = open(&paths);
            let mut prompter = ScriptedPrompter {
                label: Some(Choice::New(LabelDraft {
                    title: format!("Label {}", expected),
                    color: "blue".to_string(),
                })),
                ..Default::default()
            };
            let book = Book::new(
                "Tor".to_string(),
                CoverState::Good,
                parse_iso_date("2015-06-15").unwrap(),
            );
            catalog.add_book(book, &mut prompter).unwrap();

            assert_eq!(catalog.books.items().last().unwrap().references.label_id, Some(expected));
        }

        let catalog = open(&paths);
        let ids: Vec<_> = catalog.references.labels.entities().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.books.len(), 3);
    }

    // The older loaders restored books and albums without their references,
    // and defaulted `archived` only for games. Every item type now resolves
    // its references on load and missing flags default to false; whether the
    // old asymmetry was intended is still an open question.
    #[test]
    fn test_reloaded_items_resolve_references_uniformly() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::in_dir(temp_dir.path());

        {
            let mut catalog = open(&paths);
            for _ in 0..2 {
                let mut prompter = ScriptedPrompter {
                    authors: vec![Choice::New(author_draft("Hayao", "Miyazaki"))],
                    ..Default::default()
                };
                let game = Game::new(
                    parse_iso_date("2017-03-03").unwrap(),
                    false,
                    parse_iso_date("2024-01-01").unwrap(),
                );
                catalog.add_game(game, &mut prompter).unwrap();
            }
            let mut prompter = ScriptedPrompter {
                authors: vec![Choice::Existing(2)],
                ..Default::default()
            };
            let movie = Movie::new(parse_iso_date("2001-07-20").unwrap(), false);
            catalog.add_movie(movie, &mut prompter).unwrap();
        }

        let catalog = open(&paths);
        assert_eq!(catalog.games.items()[0].references.author_ids, vec![1]);
        assert_eq!(catalog.games.items()[1].references.author_ids, vec![2]);
        assert!(!catalog.games.items()[1].archived);
        assert_eq!(catalog.movies.items()[0].references.author_ids, vec![2]);
        assert!(catalog.list_movies().contains("Authors: Hayao Miyazaki"));
    }

    #[test]
    fn test_open_reports_problems() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::in_dir(temp_dir.path());
        fs::write(&paths.genres, "{\"id\":1,\"name\":\"Rock\"}\n{oops\n").unwrap();
        fs::write(
            &paths.music_albums,
            "{\"publish_date\":\"2020-05-01\",\"genre_id\":1,\"label_id\":8}\n",
        )
        .unwrap();

        let (catalog, report) = Catalog::open(&paths).unwrap();
        assert_eq!(
            report,
            LoadReport {
                skipped_records: 1,
                dangling_references: 1,
            }
        );
        assert_eq!(catalog.albums.items()[0].references.genre_id, Some(1));
        assert!(!catalog.albums.items()[0].on_spotify);
    }

    #[test]
    fn test_item_write_failure_keeps_item_in_session() {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = StorePaths::in_dir(temp_dir.path());
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        paths.books = blocker.join("books.json");

        let mut catalog = open(&paths);
        let book = Book::new(
            "Nowhere".to_string(),
            CoverState::Bad,
            parse_iso_date("1980-01-01").unwrap(),
        );
        let err = catalog
            .add_book(book, &mut ScriptedPrompter::default())
            .unwrap_err();

        assert!(err.is_write_failure());
        assert_eq!(catalog.books.len(), 1);
        assert!(catalog.list_books().starts_with("1. Publisher: Nowhere"));
    }
}
