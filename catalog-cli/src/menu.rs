use std::fmt;

/// Every action of the main menu, keyed by the number the user types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ListBooks,
    ListAlbums,
    ListMovies,
    ListGames,
    ListGenres,
    ListLabels,
    ListAuthors,
    AddBook,
    AddAlbum,
    AddMovie,
    AddGame,
    Quit,
}

impl MenuCommand {
    /// All commands in the order they are displayed
    pub fn all() -> &'static [MenuCommand] {
        &[
            MenuCommand::ListBooks,
            MenuCommand::ListAlbums,
            MenuCommand::ListMovies,
            MenuCommand::ListGames,
            MenuCommand::ListGenres,
            MenuCommand::ListLabels,
            MenuCommand::ListAuthors,
            MenuCommand::AddBook,
            MenuCommand::AddAlbum,
            MenuCommand::AddMovie,
            MenuCommand::AddGame,
            MenuCommand::Quit,
        ]
    }

    pub fn number(self) -> u32 {
        match self {
            MenuCommand::ListBooks => 1,
            MenuCommand::ListAlbums => 2,
            MenuCommand::ListMovies => 3,
            MenuCommand::ListGames => 4,
            MenuCommand::ListGenres => 5,
            MenuCommand::ListLabels => 6,
            MenuCommand::ListAuthors => 7,
            MenuCommand::AddBook => 9,
            MenuCommand::AddAlbum => 10,
            MenuCommand::AddMovie => 11,
            MenuCommand::AddGame => 12,
            MenuCommand::Quit => 0,
        }
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.number() == number)
    }

    /// Parses a line typed at the menu prompt
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<u32>().ok().and_then(Self::from_number)
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuCommand::ListBooks => "List all books.",
            MenuCommand::ListAlbums => "List all music albums.",
            MenuCommand::ListMovies => "List all movies.",
            MenuCommand::ListGames => "List all games.",
            MenuCommand::ListGenres => "List all genres.",
            MenuCommand::ListLabels => "List all labels.",
            MenuCommand::ListAuthors => "List all authors.",
            MenuCommand::AddBook => "Add a book.",
            MenuCommand::AddAlbum => "Add a music album.",
            MenuCommand::AddMovie => "Add a movie.",
            MenuCommand::AddGame => "Add a game.",
            MenuCommand::Quit => "Quit.",
        }
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.number(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_round_trip() {
        for &command in MenuCommand::all() {
            assert_eq!(MenuCommand::from_number(command.number()), Some(command));
        }
    }

    #[test]
    fn test_parse_menu_input() {
        assert_eq!(MenuCommand::parse("9"), Some(MenuCommand::AddBook));
        assert_eq!(MenuCommand::parse(" 0\n"), Some(MenuCommand::Quit));
        assert_eq!(MenuCommand::parse("12"), Some(MenuCommand::AddGame));
        assert_eq!(MenuCommand::parse("8"), None);
        assert_eq!(MenuCommand::parse("13"), None);
        assert_eq!(MenuCommand::parse("books"), None);
        assert_eq!(MenuCommand::parse("-1"), None);
        assert_eq!(MenuCommand::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MenuCommand::AddAlbum.to_string(), "10 - Add a music album.");
    }
}
