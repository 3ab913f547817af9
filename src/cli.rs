use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{discovery, io_utils::parse_delimiter};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Search merged CSV price lists by item name, cheapest per kilogram first",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the price lists and start the interactive search loop (default)
    Interactive,
    /// Run a single search and print the ranked result
    Search(SearchArgs),
    /// Print the active column synonym table
    Aliases,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Directory holding the price lists (subdirectories are not scanned)
    #[arg(short = 'd', long = "dir", default_value = ".", global = true)]
    pub dir: PathBuf,
    /// Substring a file name must contain to be loaded
    #[arg(long, default_value = discovery::DEFAULT_NAME_MARKER, global = true)]
    pub marker: String,
    /// File extension of price lists
    #[arg(long, default_value = discovery::DEFAULT_EXTENSION, global = true)]
    pub extension: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter, global = true)]
    pub delimiter: Option<u8>,
    /// Character encoding of the price lists (defaults to utf-8)
    #[arg(long = "input-encoding", global = true)]
    pub input_encoding: Option<String>,
    /// YAML file replacing the built-in column synonym table
    #[arg(long, global = true)]
    pub aliases: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for in item names (empty lists everything)
    #[arg(default_value = "")]
    pub term: String,
    /// Also export the result to this file (.html or .csv)
    #[arg(short = 'e', long = "export")]
    pub export: Option<String>,
    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
