use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Catalog your books, music albums, games and movies")]
pub struct Cli {
    /// Directory holding the catalog files (overrides MEDIA_CATALOG_DIR and the config file)
    #[clap(long, short = 'd')]
    pub data_dir: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.media-catalog.config)
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[clap(long, short = 'v')]
    pub verbose: bool,
}
