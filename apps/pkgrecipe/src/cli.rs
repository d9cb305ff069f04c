//! Command line interface definition

use clap::{Parser, Subcommand};
use pkgrecipe_types::ColorChoice;
use std::path::{Path, PathBuf};

/// pkgrecipe - package recipe descriptor
#[derive(Parser)]
#[command(name = "pkgrecipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Declare, export, package and import files for a package recipe")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the recipe's identity and pinned requirements
    Declare {
        /// Path to recipe file (.yml)
        recipe: PathBuf,
    },

    /// Copy the recipe's export set next to a destination
    Export {
        /// Path to recipe file (.yml)
        recipe: PathBuf,

        /// Directory receiving the exported files
        #[arg(long, value_name = "DIR")]
        dest: PathBuf,
    },

    /// Materialize the package layout from a built source tree
    Package {
        /// Path to recipe file (.yml)
        recipe: PathBuf,

        /// Root of the built source tree
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Package root (defaults to the configured package dir)
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Copy built dependency artifacts into the local import area
    Imports {
        /// Path to recipe file (.yml)
        recipe: PathBuf,

        /// Dependency roots; when absent, requirements are located in the cache
        #[arg(long = "root", value_name = "DIR")]
        roots: Vec<PathBuf>,

        /// Import root (defaults to the configured import dir)
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },
}

impl Commands {
    /// Recipe file every command operates on
    pub fn recipe(&self) -> &Path {
        match self {
            Commands::Declare { recipe }
            | Commands::Export { recipe, .. }
            | Commands::Package { recipe, .. }
            | Commands::Imports { recipe, .. } => recipe.as_path(),
        }
    }
}
