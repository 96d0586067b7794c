//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::config::OutputFormat;

/// tfdeps - dependency graph analyzer for Terragrunt/Terraform trees
#[derive(Parser, Debug)]
#[command(name = "tfdeps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build the dependency graph of a Terragrunt/Terraform tree and find circular dependencies")]
#[command(long_about = "tfdeps scans a directory tree of terragrunt.hcl orchestration files and .tf module \
definitions, builds the directed dependency graph between deployable units, reports every circular \
dependency with refactoring suggestions, and renders the graph as JSON, Graphviz DOT, Mermaid or a \
self-contained HTML page.")]
#[command(after_help = "EXAMPLES:

    # Analyze the current directory and print the JSON report
    tfdeps

    # Analyze a specific tree
    tfdeps --path ./live

    # Render a Graphviz graph
    tfdeps --path ./live --format dot --output deps.dot

    # Interactive HTML page
    tfdeps --path ./live --format html --output deps.html

    # Reproducible output (no generation timestamp)
    tfdeps --path ./live --no-timestamp

    # Which units are deployed after network/vpc?
    tfdeps --path ./live --impact network/vpc

    # Create a default .tfdeps.toml
    tfdeps --init
")]
pub struct Args {
    /// Root directory of the configuration tree
    #[arg(short, long, value_name = "DIR", help = "Root directory to scan (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, value_name = "FORMAT", help = "Output format: json (default), dot, mermaid or html")]
    pub format: Option<FormatArg>,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE", help = "File to write the rendered report to (stdout if not specified)")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to a configuration file (defaults to .tfdeps.toml lookup)")]
    pub config: Option<PathBuf>,

    /// Exclude paths matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob pattern for directories or files to skip (repeatable, replaces the defaults)")]
    pub exclude: Vec<String>,

    /// Maximum depth for directory traversal
    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth to traverse")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links during directory traversal
    #[arg(long, help = "Follow symbolic links (loops are reported as diagnostics)")]
    pub follow_links: bool,

    /// Disable parallel parsing
    #[arg(long, help = "Parse files on a single thread")]
    pub no_parallel: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose", help = "Only print the report and errors")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show debug logging and every diagnostic in the summary")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colors in the summary")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars")]
    pub no_progress: bool,

    /// Leave the generation timestamp out of the report
    #[arg(long, help = "Omit generated_at so repeated runs produce identical output")]
    pub no_timestamp: bool,

    /// Print the downstream set of one module
    #[arg(long, value_name = "MODULE", help = "Print every module transitively deployed after MODULE (an id such as network/vpc)")]
    pub impact: Option<String>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.tfdeps.toml) in the current directory")]
    pub init: bool,
}

/// Output format options accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Full report as JSON
    Json,
    /// Graphviz digraph
    Dot,
    /// Mermaid flowchart
    Mermaid,
    /// Self-contained interactive HTML page
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Dot => OutputFormat::Dot,
            FormatArg::Mermaid => OutputFormat::Mermaid,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

impl Args {
    /// Parse command-line arguments, returning clap's error (including the
    /// `--help`/`--version` displays) instead of exiting
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Args::try_parse()
    }
}
