use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "scriptedt", about = concat!("scriptedt v", env!("CARGO_PKG_VERSION"), " - seventy cards, one story"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Project id to work on (default: the last opened project)
    #[arg(short = 'p', long = "project", global = true)]
    pub project: Option<String>,

    /// Use a different registry file
    #[arg(long, global = true)]
    pub registry: Option<String>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project with 70 empty cards
    New(NewArgs),
    /// List, open or remove registered projects
    Projects(ProjectsCmd),
    /// List the deck in display order
    Cards,
    /// Show a card
    Show(ShowArgs),
    /// Replace a card's text with stdin
    Write(WriteArgs),
    /// Swap the cards at two positions
    Swap(SwapArgs),
    /// Set or clear a card's title
    Rename(RenameArgs),
    /// Run a deck command line, e.g. "swap 3 5"
    Exec(ExecArgs),
    /// Print the story outline
    Outline,
    /// Write export files under exports/
    Export(ExportArgs),
    /// Search card text by regex
    Search(SearchArgs),
    /// Show how many cards are written
    Status,
}

// ---------------------------------------------------------------------------
// Project args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,
    /// Directory to create the project in (default: scripts_dir from config)
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List registered projects (default)
    List,
    /// Make a project the current one
    Open(ProjectIdArg),
    /// Remove a project from the registry, keeping its files
    Remove(ProjectIdArg),
    /// Remove a project and delete its directory
    Delete(ProjectsDeleteArgs),
}

#[derive(Args)]
pub struct ProjectIdArg {
    /// Project id
    pub id: String,
}

#[derive(Args)]
pub struct ProjectsDeleteArgs {
    /// Project id
    pub id: String,
    /// Confirm permanent deletion
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Card args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Card number (1-70)
    pub card: usize,
    /// Print the whole card instead of a preview
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Card number (1-70)
    pub card: usize,
}

#[derive(Args)]
pub struct SwapArgs {
    /// First position (1-70)
    pub first: usize,
    /// Second position (1-70)
    pub second: usize,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Card number (1-70)
    pub card: usize,
    /// New title; omit to remove the title
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct ExecArgs {
    /// Command line, e.g. "rename 2 'The Red Room'"
    pub line: String,
}

// ---------------------------------------------------------------------------
// Output args
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Markdown,
    Fountain,
    Outline,
    All,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Format to export
    #[arg(value_enum, default_value = "all")]
    pub format: ExportTarget,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}
