//! Locating built dependencies for the `imports` phase
//!
//! Placing a descriptor into a dependency graph is the host's job. This
//! module only answers "where does the already-built instance of this pinned
//! reference live", which is all `imports` needs.

use crate::PackageDescriptor;
use pkgrecipe_errors::{ResolveError, Result};
use pkgrecipe_types::DependencyRef;
use std::path::{Path, PathBuf};

/// Subdirectory of a cached instance holding its packaged files
pub const PACKAGE_SUBDIR: &str = "package";

/// Maps a pinned reference to the root of its built package
pub trait DependencyLocator {
    fn locate(&self, dep: &DependencyRef) -> Option<PathBuf>;
}

/// A local package cache laid out as
/// `<root>/<name>/<version>/<owner>/<channel>/package`
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `dep` would live, whether or not it exists
    #[must_use]
    pub fn package_path(&self, dep: &DependencyRef) -> PathBuf {
        self.root
            .join(&dep.package_name)
            .join(&dep.version)
            .join(dep.owner())
            .join(dep.channel_name())
            .join(PACKAGE_SUBDIR)
    }
}

impl DependencyLocator for LocalCache {
    fn locate(&self, dep: &DependencyRef) -> Option<PathBuf> {
        let path = self.package_path(dep);
        path.is_dir().then_some(path)
    }
}

/// Locate every requirement of `descriptor`, in declaration order
///
/// # Errors
///
/// Returns `ResolveError::DependencyUnresolved` for the first requirement the
/// locator cannot find.
pub fn resolve_all(
    descriptor: &PackageDescriptor,
    locator: &dyn DependencyLocator,
) -> Result<Vec<(DependencyRef, PathBuf)>> {
    descriptor
        .requirements()
        .iter()
        .map(|dep| {
            locator
                .locate(dep)
                .map(|root| (dep.clone(), root))
                .ok_or_else(|| {
                    ResolveError::DependencyUnresolved {
                        reference: dep.to_string(),
                    }
                    .into()
                })
        })
        .collect()
}
