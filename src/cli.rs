use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Shared application context for presentation flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // --quiet
    pub no_color: bool, // --no-color
    pub dry_run: bool,  // --dry-run
}

impl From<&Cli> for AppContext {
    fn from(cli: &Cli) -> Self {
        Self {
            quiet: cli.quiet,
            no_color: cli.no_color,
            dry_run: cli.dry_run,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "symlinkit")]
#[command(about = "Mirror directory trees as symlinks to the original files")]
#[command(override_usage = "symlinkit [OPTIONS] <SOURCE>... <DESTINATION>")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Source directories followed by the destination directory
    #[arg(
        value_name = "PATHS",
        num_args = 2..,
        required_unless_present = "print_config"
    )]
    pub paths: Vec<PathBuf>,

    /// Overwrite existing entries in the destination
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Remove dead symlinks from the destination after mirroring
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Prefix prepended to the file name of every created link
    #[arg(long, value_name = "STRING")]
    pub prefix: Option<String>,

    /// Skip source entries matching this glob (relative to the source root)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Descend into symlinked directories inside sources
    #[arg(short = 'L', long = "follow")]
    pub follow: bool,

    /// Store absolute link targets regardless of how sources were given
    #[arg(short = 'a', long)]
    pub absolute: bool,

    /// Load defaults from a TOML/YAML/JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Show what would be done without touching the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress the run summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
