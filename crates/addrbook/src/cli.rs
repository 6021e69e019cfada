//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Expand mail aliases and classify addresses.
#[derive(Parser, Debug)]
#[command(name = "addrbook", author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (JSON)
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra files of alias, group and list commands to read
    #[arg(long, short, global = true, value_name = "PATH")]
    pub source: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand aliases in an address list and print the result
    Expand {
        /// Address text, e.g. "work, Carol <carol@example.org>"
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Show Unicode domains instead of their ASCII form
        #[arg(long, short)]
        display: bool,
    },

    /// List defined aliases
    #[command(alias = "ls")]
    Aliases {
        /// Only aliases carrying this tag
        #[arg(long, short)]
        tag: Option<String>,
    },

    /// Report how each address is classified
    Check {
        /// Addresses to check
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Define a new alias and append it to the alias file
    Add {
        /// Alias name
        name: String,

        /// Address text the alias expands to
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Free-text comment
        #[arg(long)]
        comment: Option<String>,

        /// Tags, comma separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Replace unsafe characters in the name with '_'
        #[arg(long)]
        fix_name: bool,
    },
}
