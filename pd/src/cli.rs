//! CLI argument parsing for promptdeck

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// promptdeck - browse prompt templates and fill their placeholders
#[derive(Parser, Debug)]
#[command(name = "pd")]
#[command(author, version, about = "Browse prompt templates and compile finished prompts", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Directory with template CSV files (overrides config)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List major categories with template counts
    Categories,

    /// List templates, optionally filtered
    List {
        /// Major category, or "all" / "すべて"
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Keyword matched against scene and minor category
        #[arg(short, long)]
        keyword: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show a template with its placeholders and guidance
    Show {
        /// Template id (from `list`)
        id: usize,
    },

    /// List the placeholders of a template
    Placeholders {
        /// Template id (from `list`)
        id: usize,
    },

    /// Print the compiled prompt using values given on the command line
    Compile {
        /// Template id (from `list`)
        id: usize,

        /// Placeholder value as NAME=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Do not prepend the attached-sources instruction
        #[arg(long)]
        no_instruction: bool,
    },

    /// Fill placeholders interactively, then print the compiled prompt
    Fill {
        /// Template id (from `list`)
        id: usize,

        /// Do not prepend the attached-sources instruction
        #[arg(long)]
        no_instruction: bool,
    },
}

/// Output format for listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Whether the instruction header is prepended for this invocation
pub fn prepend_instruction(config_default: bool, no_instruction: bool) -> bool {
    debug!(config_default, no_instruction, "prepend_instruction: called");
    config_default && !no_instruction
}

/// Location of the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptdeck")
        .join("logs")
        .join("promptdeck.log");
    debug!(?path, "get_log_path: returning path");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile_with_values() {
        let cli = Cli::try_parse_from(["pd", "compile", "3", "-s", "会社名=Acme", "--set", "課題=離職", "--no-instruction"])
            .unwrap();

        match cli.command {
            Command::Compile { id, set, no_instruction } => {
                assert_eq!(id, 3);
                assert_eq!(set, vec!["会社名=Acme", "課題=離職"]);
                assert!(no_instruction);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from(["pd", "-d", "prompts", "list", "-C", "競合分析", "-k", "会議", "-f", "json"]).unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("prompts")));
        match cli.command {
            Command::List {
                category,
                keyword,
                format,
            } => {
                assert_eq!(category.as_deref(), Some("競合分析"));
                assert_eq!(keyword.as_deref(), Some("会議"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_prepend_instruction() {
        assert!(prepend_instruction(true, false));
        assert!(!prepend_instruction(true, true));
        assert!(!prepend_instruction(false, false));
    }
}
