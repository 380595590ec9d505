use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use inquire::validator::{Validation, ValueRequiredValidator};
use inquire::{Confirm, Select, Text};

use catalog_core::{
    parse_iso_date, Author, AuthorDraft, Book, Choice, CoverState, EntityId, Game, Genre,
    GenreDraft, Label, LabelDraft, Movie, MusicAlbum, Prompter, ReferenceEntity,
};

/// Prompts for a date until a valid `YYYY-MM-DD` value is entered
pub fn prompt_date(message: &str) -> Result<NaiveDate> {
    let input = Text::new(message)
        .with_help_message("YYYY-MM-DD")
        .with_validator(|input: &str| {
            if parse_iso_date(input).is_some() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    "Invalid date! Please enter a valid date in the format YYYY-MM-DD.".into(),
                ))
            }
        })
        .prompt()?;

    parse_iso_date(&input).with_context(|| format!("Invalid date: {}", input))
}

fn prompt_required(message: &str) -> Result<String> {
    let value = Text::new(message)
        .with_validator(ValueRequiredValidator::default())
        .prompt()?;
    Ok(value.trim().to_string())
}

/// Prompts the user for the fields of a new book
pub fn prompt_new_book() -> Result<Book> {
    let publisher = prompt_required("Publisher:")?;
    let cover_state = Select::new("Cover state:", vec![CoverState::Good, CoverState::Bad]).prompt()?;
    let publish_date = prompt_date("Publish date of the book:")?;

    Ok(Book::new(publisher, cover_state, publish_date))
}

/// Prompts the user for the fields of a new music album
pub fn prompt_new_album() -> Result<MusicAlbum> {
    let publish_date = prompt_date("Publish date of the album:")?;
    let on_spotify = Confirm::new("Is it on Spotify?")
        .with_default(false)
        .prompt()?;

    Ok(MusicAlbum::new(publish_date, on_spotify))
}

/// Prompts the user for the fields of a new game
pub fn prompt_new_game() -> Result<Game> {
    let publish_date = prompt_date("Publish date of the game:")?;
    let multiplayer = Confirm::new("Does the game have multiplayer?")
        .with_default(false)
        .prompt()?;
    let last_played_at = prompt_date("Last played date of the game:")?;

    Ok(Game::new(publish_date, multiplayer, last_played_at))
}

/// Prompts the user for the fields of a new movie
pub fn prompt_new_movie() -> Result<Movie> {
    let publish_date = prompt_date("Publish date of the movie:")?;
    let silent = Confirm::new("Is it a silent movie?")
        .with_default(false)
        .prompt()?;

    Ok(Movie::new(publish_date, silent))
}

enum Pick {
    Skip,
    New,
    Existing(EntityId),
}

/// Offers "skip", "create new" and every existing entity
fn pick_reference<E: ReferenceEntity>(message: &str, skip: &str, existing: &[E]) -> Result<Pick> {
    let mut options = vec![skip.to_string(), format!("Create new {}", E::KIND)];
    options.extend(existing.iter().map(|e| e.to_string()));

    let selected = Select::new(message, options).raw_prompt()?;

    Ok(match selected.index {
        0 => Pick::Skip,
        1 => Pick::New,
        index => existing
            .get(index - 2)
            .map_or(Pick::Skip, |e| Pick::Existing(e.id())),
    })
}

/// How a newly typed author relates to the authors already available
#[derive(Debug, PartialEq, Eq)]
enum AuthorMatch {
    Existing(EntityId),
    /// Typed earlier for the same item
    Pending,
    Fresh,
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn match_author(
    draft: &AuthorDraft,
    existing: &[Author],
    pending: &[Choice<AuthorDraft>],
) -> AuthorMatch {
    let same_author = |first: &str, last: &str| {
        same_name(first, &draft.first_name) && same_name(last, &draft.last_name)
    };

    if let Some(author) = existing
        .iter()
        .find(|a| same_author(&a.first_name, &a.last_name))
    {
        return AuthorMatch::Existing(author.id);
    }

    let typed_before = pending.iter().any(|choice| match choice {
        Choice::New(d) => same_author(&d.first_name, &d.last_name),
        Choice::Existing(_) => false,
    });
    if typed_before {
        AuthorMatch::Pending
    } else {
        AuthorMatch::Fresh
    }
}

/// Decoration prompts backed by the terminal
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn choose_authors(&mut self, existing: &[Author]) -> Result<Vec<Choice<AuthorDraft>>> {
        let mut choices = Vec::new();

        loop {
            let message = if choices.is_empty() {
                "Author:"
            } else {
                "Another author:"
            };
            match pick_reference(message, "No more authors", existing)? {
                Pick::Skip => break,
                Pick::New => {
                    let draft = AuthorDraft {
                        first_name: prompt_required("First name:")?,
                        last_name: prompt_required("Last name:")?,
                    };
                    match match_author(&draft, existing, &choices) {
                        AuthorMatch::Existing(id) => {
                            println!(
                                "{} {} {} already exists, reusing it",
                                "Author".dimmed(),
                                draft.first_name,
                                draft.last_name
                            );
                            choices.push(Choice::Existing(id));
                        }
                        AuthorMatch::Pending => {
                            println!(
                                "{} {} {} was already added to this item",
                                "Author".dimmed(),
                                draft.first_name,
                                draft.last_name
                            );
                        }
                        AuthorMatch::Fresh => {
                            println!("{} {} {}", "Author".dimmed(), draft.first_name, draft.last_name);
                            choices.push(Choice::New(draft));
                        }
                    }
                }
                Pick::Existing(id) => choices.push(Choice::Existing(id)),
            }
        }

        Ok(choices)
    }

    fn choose_genre(&mut self, existing: &[Genre]) -> Result<Option<Choice<GenreDraft>>> {
        Ok(match pick_reference("Genre:", "No genre", existing)? {
            Pick::Skip => None,
            Pick::New => Some(Choice::New(GenreDraft {
                name: prompt_required("Genre name:")?,
            })),
            Pick::Existing(id) => Some(Choice::Existing(id)),
        })
    }

    fn choose_label(&mut self, existing: &[Label]) -> Result<Option<Choice<LabelDraft>>> {
        Ok(match pick_reference("Label:", "No label", existing)? {
            Pick::Skip => None,
            Pick::New => {
                let title = prompt_required("Label title:")?;
                let color = prompt_required("Label color:")?;
                Some(Choice::New(LabelDraft { title, color }))
            }
            Pick::Existing(id) => Some(Choice::Existing(id)),
        })
    }
}
