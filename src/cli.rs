use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Result limit used when neither a template nor `--max-results` says otherwise
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// jiraq - Query an issue tracker from the command line
#[derive(Parser, Debug)]
#[command(name = "jiraq")]
#[command(about = "Run JQL searches and named query templates against Jira")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Search for issues
    Search(SearchArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchArgs {
    /// The format of the output
    #[arg(short, long, value_enum, default_value_t = Format::List)]
    pub format: Format,

    /// The amount of records to display
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: u32,

    /// The JQL you want to run
    #[arg(short, long)]
    pub query: Option<String>,

    /// The name of the template that holds the JQL you want to run
    #[arg(short, long)]
    pub template: Option<String>,

    /// Extra positional arguments (ignored)
    pub args: Vec<String>,
}

impl SearchArgs {
    /// Template name, treating an empty value as not given.
    pub fn template_name(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    /// Inline query, treating an empty value as not given.
    pub fn inline_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One line per issue
    #[default]
    List,
    /// Issue and story point totals
    Table,
}
