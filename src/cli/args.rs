//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::OrderKey;

/// Build trees from adjacency files or binary-tree arrays, lay them out and render them
#[derive(Parser, Debug)]
#[command(name = "treevis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .treevis.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print node coordinates
    Layout {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the tree as ASCII art
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Render the tree as SVG
    Svg {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
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

/// Where the tree comes from and how it is shaped before layout.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// TOML adjacency file
    #[arg(value_hint = ValueHint::FilePath, required_unless_present = "binary")]
    pub file: Option<PathBuf>,

    /// Level-order binary-tree array, e.g. "1,null,3"
    #[arg(short, long, value_delimiter = ',', conflicts_with_all = ["file", "root"])]
    pub binary: Option<Vec<String>>,

    /// Root identifier (default: document root, then first node)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Order children recursively by identifier
    #[arg(long, conflicts_with = "order_by")]
    pub order: bool,

    /// Order children recursively by the given key
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Horizontal distance between neighbouring leaves
    #[arg(long)]
    pub x_spacing: Option<f64>,

    /// Vertical distance between levels
    #[arg(long)]
    pub y_spacing: Option<f64>,
}

impl InputArgs {
    pub fn order_key(&self) -> Option<OrderKey> {
        match (self.order, self.order_by) {
            (_, Some(OrderBy::Id)) | (true, None) => Some(OrderKey::Id),
            (_, Some(OrderBy::Label)) => Some(OrderKey::Label),
            (false, None) => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Id,
    Label,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
