//! Text rendering of the in-memory collections
//!
//! Listings are 1-indexed and follow insertion order. An empty collection is
//! rendered as an explicit message instead of an empty list.

use std::fmt::Write;

use crate::models::{CatalogItem, ItemReferences, ReferenceEntity};
use crate::references::ReferenceStores;

/// Renders reference entities, one per line
pub fn render_entities<E: ReferenceEntity>(entities: &[E]) -> String {
    if entities.is_empty() {
        return empty_message(E::PLURAL);
    }

    let mut out = String::new();
    for (index, entity) in entities.iter().enumerate() {
        let _ = writeln!(out, "{}. {} (ID: {})", index + 1, entity, entity.id());
    }
    out
}

/// Renders catalog items with their resolved references, one per line
pub fn render_items<T: CatalogItem>(items: &[T], stores: &ReferenceStores) -> String {
    if items.is_empty() {
        return empty_message(T::PLURAL);
    }

    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let _ = write!(out, "{}. {}", index + 1, item.details());
        let references = describe_references(item.references(), stores);
        if !references.is_empty() {
            let _ = write!(out, " | {}", references);
        }
        out.push('\n');
    }
    out
}

/// Describes attached references, e.g. `Authors: Ada Lovelace | Genre: Rock`
///
/// Ids that do not resolve are left out.
pub fn describe_references(references: &ItemReferences, stores: &ReferenceStores) -> String {
    let mut parts = Vec::new();

    let authors: Vec<String> = references
        .author_ids
        .iter()
        .filter_map(|&id| stores.author(id))
        .map(|a| a.to_string())
        .collect();
    if !authors.is_empty() {
        parts.push(format!("Authors: {}", authors.join(", ")));
    }

    if let Some(genre) = references.genre_id.and_then(|id| stores.genre(id)) {
        parts.push(format!("Genre: {}", genre));
    }

    if let Some(label) = references.label_id.and_then(|id| stores.label(id)) {
        parts.push(format!("Label: {}", label));
    }

    parts.join(" | ")
}

fn empty_message(plural: &str) -> String {
    format!("No {} available.\n", plural)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::tests::{author_draft, open_stores};
    use crate::models::{parse_iso_date, Author, Genre, GenreDraft, Movie, MusicAlbum};
    use tempfile::TempDir;

    #[test]
    fn test_empty_collections_say_so() {
        let temp_dir = TempDir::new().unwrap();
        let stores = open_stores(temp_dir.path());

        assert_eq!(render_entities::<Genre>(&[]), "No genres available.\n");
        assert_eq!(
            render_items::<MusicAlbum>(&[], &stores),
            "No music albums available.\n"
        );
    }

    #[test]
    fn test_entities_are_one_indexed_in_insertion_order() {
        let authors = vec![
            Author::from_draft(7, author_draft("Grace", "Hopper")),
            Author::from_draft(2, author_draft("Ada", "Lovelace")),
        ];

        assert_eq!(
            render_entities(&authors),
            "1. Grace Hopper (ID: 7)\n2. Ada Lovelace (ID: 2)\n"
        );
    }

    #[test]
    fn test_items_show_resolved_references() {
        let temp_dir = TempDir::new().unwrap();
        let mut stores = open_stores(temp_dir.path());
        stores
            .authors
            .insert(Author::from_draft(1, author_draft("Ada", "Lovelace")))
            .unwrap();
        stores
            .genres
            .insert(Genre::from_draft(
                1,
                GenreDraft {
                    name: "Drama".to_string(),
                },
            ))
            .unwrap();

        let mut decorated = Movie::new(parse_iso_date("1927-01-10").unwrap(), true);
        decorated.references.attach_author(1);
        decorated.references.genre_id = Some(1);
        let bare = Movie::new(parse_iso_date("1999-03-31").unwrap(), false);

        let rendered = render_items(&[decorated, bare], &stores);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "1. Published: 1927-01-10, Silent: yes | Authors: Ada Lovelace | Genre: Drama",
                "2. Published: 1999-03-31, Silent: no",
            ]
        );
    }
}
