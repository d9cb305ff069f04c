use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::FailureContext;

/// The file-materialization phases a descriptor exposes to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipePhase {
    /// Copy the recipe's export set next to the recipe
    Export,
    /// Materialize the redistributable package
    Package,
    /// Copy dependency artifacts into the local import area
    Imports,
}

impl RecipePhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Package => "package",
            Self::Imports => "imports",
        }
    }
}

impl fmt::Display for RecipePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor and copy-phase events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecipeEvent {
    /// A descriptor passed validation
    Declared {
        package: String,
        requirements: Vec<String>,
    },

    /// A phase began copying from `root` into `destination`
    PhaseStarted {
        package: String,
        phase: RecipePhase,
        root: PathBuf,
        destination: PathBuf,
    },

    /// One file was written
    FileCopied {
        phase: RecipePhase,
        source: PathBuf,
        destination: PathBuf,
    },

    /// One file already had identical contents at its destination
    FileUnchanged {
        phase: RecipePhase,
        destination: PathBuf,
    },

    /// A rule's source directory was absent and the phase tolerates that
    SourceSkipped { phase: RecipePhase, path: PathBuf },

    /// A phase finished; zero counts mean nothing matched
    PhaseCompleted {
        package: String,
        phase: RecipePhase,
        copied: usize,
        unchanged: usize,
    },

    /// A phase aborted
    PhaseFailed {
        package: String,
        phase: RecipePhase,
        failure: FailureContext,
    },
}
