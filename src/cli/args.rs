//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::TraversalKind;

/// Named-node tree: insert by parent name, delete subtrees, traverse
#[derive(Parser, Debug)]
#[command(name = "nametree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Start from a JSON snapshot instead of the seed root
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a command script
    Run {
        /// Script file
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Read commands from stdin
    Repl,

    /// Add a node and show the tree
    Add {
        /// Node name
        name: String,
        /// Node value
        value: String,
        /// Parent name (empty = new root)
        #[arg(short, long, default_value = "")]
        parent: String,
    },

    /// Delete every non-root node with this name (the root clears the tree)
    Delete {
        /// Node name
        name: String,
    },

    /// Print a traversal: preOrder, inOrder or postOrder
    Traverse {
        /// Traversal order
        kind: TraversalKind,
    },

    /// Show the tree
    Show {
        /// Print the JSON snapshot instead
        #[arg(long)]
        json: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
