mod cli;
mod menu;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use inquire::error::InquireError;
use inquire::Text;

use catalog_core::{
    determine_data_dir, get_config_path, Catalog, CatalogConfig, CatalogError, DecorateError,
    Prompter, StorePaths,
};

use crate::cli::Cli;
use crate::menu::MenuCommand;
use crate::prompts::InquirePrompter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine which data directory to use
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };
    let config = CatalogConfig::load_or_create(&config_path)?;
    let data_dir = determine_data_dir(cli.data_dir.as_deref(), &config);
    log::debug!("Using data directory {}", data_dir.display());

    let (mut catalog, report) = Catalog::open(&StorePaths::in_dir(&data_dir))
        .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;

    if report.skipped_records > 0 {
        println!(
            "{}",
            format!(
                "Skipped {} unreadable record(s) while loading.",
                report.skipped_records
            )
            .yellow()
        );
    }
    if report.dangling_references > 0 {
        println!(
            "{}",
            format!(
                "Dropped {} reference(s) to authors, genres or labels that no longer exist.",
                report.dangling_references
            )
            .yellow()
        );
    }

    let mut prompter = InquirePrompter;

    loop {
        print_menu();

        let input = match Text::new("Option:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let Some(command) = MenuCommand::parse(&input) else {
            show_error();
            continue;
        };

        if command == MenuCommand::Quit {
            break;
        }

        if let Err(e) = run_command(command, &mut catalog, &mut prompter) {
            report_error(&e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_menu() {
    println!();
    println!("Please choose an option by entering a number:");
    for command in MenuCommand::all() {
        println!("{}", command);
    }
}

fn show_error() {
    println!("{}", "Error! Please select a valid option.".red());
}

fn run_command(
    command: MenuCommand,
    catalog: &mut Catalog,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match command {
        MenuCommand::ListBooks => print_listing("Books", &catalog.list_books()),
        MenuCommand::ListAlbums => print_listing("Music albums", &catalog.list_albums()),
        MenuCommand::ListMovies => print_listing("Movies", &catalog.list_movies()),
        MenuCommand::ListGames => print_listing("Games", &catalog.list_games()),
        MenuCommand::ListGenres => print_listing("Genres", &catalog.list_genres()),
        MenuCommand::ListLabels => print_listing("Labels", &catalog.list_labels()),
        MenuCommand::ListAuthors => print_listing("Authors", &catalog.list_authors()),
        MenuCommand::AddBook => {
            let book = prompts::prompt_new_book()?;
            catalog.add_book(book, prompter)?;
            print_added("Book");
        }
        MenuCommand::AddAlbum => {
            let album = prompts::prompt_new_album()?;
            catalog.add_album(album, prompter)?;
            print_added("Album");
        }
        MenuCommand::AddMovie => {
            let movie = prompts::prompt_new_movie()?;
            catalog.add_movie(movie, prompter)?;
            print_added("Movie");
        }
        MenuCommand::AddGame => {
            let game = prompts::prompt_new_game()?;
            catalog.add_game(game, prompter)?;
            print_added("Game");
        }
        MenuCommand::Quit => {}
    }

    Ok(())
}

fn print_listing(title: &str, listing: &str) {
    println!("{}", format!("{}:", title).bold());
    print!("{}", listing);
}

fn print_added(kind: &str) {
    println!("----------------------------------------------");
    println!("{}", format!("{} added successfully!", kind).green());
    println!("----------------------------------------------");
}

/// Prints a failed action; the menu loop always continues afterwards
fn report_error(err: &anyhow::Error) {
    if is_cancellation(err) {
        println!("{}", "Cancelled.".yellow());
        return;
    }

    match err.downcast_ref::<CatalogError>().and_then(write_failure_warning) {
        Some(warning) => println!("{}", warning.yellow()),
        None => println!("{} {:#}", "Error:".red(), err),
    }
}

/// Describes what stayed in memory after a failed write, if anything did
fn write_failure_warning(err: &CatalogError) -> Option<String> {
    if !err.is_write_failure() {
        return None;
    }

    Some(match err {
        CatalogError::Save { kind, .. } => format!(
            "Warning: {}. The {} is listed for this session but may not survive a restart.",
            err, kind
        ),
        CatalogError::Decorate { kind, .. } => format!(
            "Warning: {}. The new author, genre or label is kept for this session but may not \
             survive a restart. The {} was not added.",
            err, kind
        ),
    })
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    fn cancelled(err: Option<&InquireError>) -> bool {
        matches!(
            err,
            Some(InquireError::OperationCanceled) | Some(InquireError::OperationInterrupted)
        )
    }

    err.chain().any(|cause| {
        cancelled(cause.downcast_ref::<InquireError>())
            || matches!(
                cause.downcast_ref::<DecorateError>(),
                Some(DecorateError::Prompt(inner)) if cancelled(inner.downcast_ref::<InquireError>())
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::StoreError;
    use std::io;
    use std::path::PathBuf;

    fn write_error() -> StoreError {
        StoreError::Write {
            path: PathBuf::from("/data/authors.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
    }

    #[test]
    fn test_failed_item_save_is_listed_for_session() {
        let err = CatalogError::Save {
            kind: "book",
            source: write_error(),
        };

        let warning = write_failure_warning(&err).unwrap();
        assert!(warning.contains("The book is listed for this session"));
        assert!(!warning.contains("was not added"));
    }

    #[test]
    fn test_failed_reference_write_says_item_was_not_added() {
        let err = CatalogError::Decorate {
            kind: "music album",
            source: DecorateError::Store(write_error()),
        };

        let warning = write_failure_warning(&err).unwrap();
        assert!(warning.contains("new author, genre or label is kept for this session"));
        assert!(warning.contains("The music album was not added."));
        assert!(!warning.contains("is listed"));
    }

    #[test]
    fn test_other_errors_get_no_warning() {
        let err = CatalogError::Decorate {
            kind: "game",
            source: DecorateError::UnknownReference { kind: "genre", id: 4 },
        };

        assert_eq!(write_failure_warning(&err), None);
    }
}
