//! YAML recipe format for pkgrecipe
//!
//! A recipe declares package identity, the pinned upstream requirements, the
//! build-system generators to emit and two ordered sets of copy rules: the
//! `package` rules run after the owning library's build, the `imports` rules
//! run after the dependencies are built.

use crate::DependencyRef;
use pkgrecipe_errors::RecipeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One glob-driven file copy
///
/// The pattern is matched lexically against paths relative to `source_dir`.
/// Both directories are relative to a root the host supplies at phase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRule {
    #[serde(rename = "pattern")]
    pub file_pattern: String,

    #[serde(rename = "dst", default)]
    pub destination_dir: String,

    #[serde(rename = "src", default)]
    pub source_dir: String,

    #[serde(rename = "keep_path", default = "default_keep_path")]
    pub preserve_relative_path: bool,

    /// Files matching any of these are skipped even if `pattern` matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

fn default_keep_path() -> bool {
    true
}

impl CopyRule {
    /// Create a rule that keeps relative sub-paths
    pub fn new(
        file_pattern: impl Into<String>,
        destination_dir: impl Into<String>,
        source_dir: impl Into<String>,
    ) -> Self {
        Self {
            file_pattern: file_pattern.into(),
            destination_dir: destination_dir.into(),
            source_dir: source_dir.into(),
            preserve_relative_path: true,
            excludes: Vec::new(),
        }
    }

    /// Flatten matched files into the destination directory
    #[must_use]
    pub fn flatten(mut self) -> Self {
        self.preserve_relative_path = false;
        self
    }

    /// Skip files matching `pattern`
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }
}

/// `requires` accepts a single reference or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requires {
    One(String),
    Many(Vec<String>),
}

impl Default for Requires {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Requires {
    /// All reference strings in declaration order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// `generators` accepts a single identifier or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Generators {
    One(String),
    Many(Vec<String>),
}

impl Default for Generators {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Generators {
    /// Collapse into a sorted, deduplicated set
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<String> {
        match self {
            Self::One(s) => BTreeSet::from([s.clone()]),
            Self::Many(v) => v.iter().cloned().collect(),
        }
    }
}

/// Complete recipe file as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    pub name: String,
    pub version: String,

    #[serde(default)]
    pub license: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub generators: Generators,

    #[serde(default, skip_serializing_if = "Requires::is_empty")]
    pub requires: Requires,

    /// Recipe-relative globs shipped alongside the recipe
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package: Vec<CopyRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<CopyRule>,
}

impl RecipeFile {
    /// Parse a recipe from YAML text
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::ParseError` if the YAML is malformed or does not
    /// match the recipe layout.
    pub fn from_yaml(contents: &str) -> Result<Self, RecipeError> {
        serde_yml::from_str(contents).map_err(|e| RecipeError::ParseError {
            message: e.to_string(),
        })
    }

    /// Render the recipe back to YAML
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::ParseError` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, RecipeError> {
        serde_yml::to_string(self).map_err(|e| RecipeError::ParseError {
            message: e.to_string(),
        })
    }
}

/// Static identity and requirements handed to the hosting resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub version: String,
    pub license: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub generators: BTreeSet<String>,
    pub requirements: Vec<DependencyRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENTURA: &str = r#"
name: ventura
version: "0.8"
license: MIT
url: http://github.com/TyRoXx/ventura
generators: cmake
requires: silicium/0.12@TyRoXx/stable
exports: ["ventura/*"]
package:
  - { pattern: "*.hpp", dst: include/ventura, src: ventura, keep_path: true }
imports:
  - { pattern: "*.dll", dst: bin, src: bin }
  - { pattern: "*.dylib*", dst: bin, src: lib }
"#;

    #[test]
    fn test_parse_recipe() {
        let recipe = RecipeFile::from_yaml(VENTURA).unwrap();
        assert_eq!(recipe.name, "ventura");
        assert_eq!(recipe.version, "0.8");
        assert_eq!(recipe.generators.to_set(), BTreeSet::from(["cmake".to_string()]));
        assert_eq!(
            recipe.requires.as_slice(),
            ["silicium/0.12@TyRoXx/stable".to_string()]
        );
        assert_eq!(recipe.package.len(), 1);
        assert_eq!(recipe.package[0].destination_dir, "include/ventura");
        assert_eq!(recipe.imports[1].file_pattern, "*.dylib*");
        assert_eq!(recipe.imports[1].source_dir, "lib");
    }

    #[test]
    fn test_keep_path_defaults_to_true() {
        let recipe = RecipeFile::from_yaml(VENTURA).unwrap();
        assert!(recipe.imports.iter().all(|r| r.preserve_relative_path));
    }

    #[test]
    fn test_requires_list() {
        let recipe = RecipeFile::from_yaml(
            "name: a\nversion: '1'\nrequires:\n  - b/1@x/stable\n  - c/2@y/testing\n",
        )
        .unwrap();
        assert_eq!(recipe.requires.as_slice().len(), 2);
        assert!(recipe.package.is_empty());
    }

    #[test]
    fn test_missing_version_is_parse_error() {
        let err = RecipeFile::from_yaml("name: a\n").unwrap_err();
        assert!(matches!(err, RecipeError::ParseError { .. }));
    }

    #[test]
    fn test_copy_rule_builders() {
        let rule = CopyRule::new("*.so*", "bin", "lib").flatten().exclude("*.a");
        assert!(!rule.preserve_relative_path);
        assert_eq!(rule.excludes, vec!["*.a".to_string()]);
    }
}
