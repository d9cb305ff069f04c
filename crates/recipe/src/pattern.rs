//! Copy-rule validation and glob compilation

use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use pkgrecipe_errors::RecipeError;
use pkgrecipe_types::CopyRule;
use std::path::{Component, Path};

/// A `CopyRule` whose patterns have been compiled and whose directories have
/// been checked to stay inside the roots they are joined onto.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: CopyRule,
    matcher: GlobMatcher,
    excludes: GlobSet,
}

impl CompiledRule {
    /// Validate and compile a rule
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::InvalidPattern` if the pattern or any exclude is
    /// not a valid glob, and `RecipeError::PathEscapesRoot` if `src` or `dst`
    /// is absolute or contains `..`.
    pub fn compile(rule: CopyRule) -> Result<Self, RecipeError> {
        ensure_relative(&rule.source_dir)?;
        ensure_relative(&rule.destination_dir)?;

        let matcher = compile_glob(&rule.file_pattern)?.compile_matcher();

        let mut builder = GlobSetBuilder::new();
        for pattern in &rule.excludes {
            builder.add(compile_glob(pattern)?);
        }
        let excludes = builder
            .build()
            .map_err(|e| RecipeError::invalid_pattern(rule.excludes.join(", "), &e))?;

        Ok(Self {
            rule,
            matcher,
            excludes,
        })
    }

    #[must_use]
    pub fn rule(&self) -> &CopyRule {
        &self.rule
    }

    /// Whether a path relative to the rule's source directory is selected
    #[must_use]
    pub fn selects(&self, relative: &Path) -> bool {
        self.matcher.is_match(relative) && !self.excludes.is_match(relative)
    }
}

/// Compile a pattern with the separator-agnostic semantics recipes rely on:
/// `*.hpp` also selects `detail/impl.hpp`.
pub(crate) fn compile_glob(pattern: &str) -> Result<Glob, RecipeError> {
    if pattern.trim().is_empty() {
        return Err(RecipeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: "empty pattern".to_string(),
        });
    }
    Glob::new(pattern).map_err(|e| RecipeError::invalid_pattern(pattern, &e))
}

/// Reject absolute paths and parent-directory components
pub(crate) fn ensure_relative(dir: &str) -> Result<(), RecipeError> {
    let escapes = Path::new(dir).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(RecipeError::PathEscapesRoot {
            path: dir.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_crosses_directories() {
        let rule = CompiledRule::compile(CopyRule::new("*.hpp", "include", "ventura")).unwrap();
        assert!(rule.selects(Path::new("path.hpp")));
        assert!(rule.selects(Path::new("detail/read_from_anonymous_pipe.hpp")));
        assert!(!rule.selects(Path::new("path.cpp")));
    }

    #[test]
    fn test_versioned_dylib_pattern() {
        let rule = CompiledRule::compile(CopyRule::new("*.dylib*", "bin", "lib")).unwrap();
        assert!(rule.selects(Path::new("libsilicium.dylib")));
        assert!(rule.selects(Path::new("libsilicium.0.12.dylib")));
        assert!(rule.selects(Path::new("libsilicium.dylib.1")));
        assert!(!rule.selects(Path::new("libsilicium.a")));
    }

    #[test]
    fn test_excludes() {
        let rule = CompiledRule::compile(
            CopyRule::new("*.hpp", "include", "").exclude("detail/*"),
        )
        .unwrap();
        assert!(rule.selects(Path::new("path.hpp")));
        assert!(!rule.selects(Path::new("detail/impl.hpp")));
    }

    #[test]
    fn test_malformed_pattern() {
        let err = CompiledRule::compile(CopyRule::new("*.{hpp", "include", "")).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidPattern { .. }));

        let err = CompiledRule::compile(CopyRule::new("*.hpp", "include", "").exclude("[a"))
            .unwrap_err();
        assert!(matches!(err, RecipeError::InvalidPattern { .. }));

        let err = CompiledRule::compile(CopyRule::new("  ", "include", "")).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidPattern { .. }));
    }

    #[test]
    fn test_escaping_dirs() {
        for (src, dst) in [
            ("../other", "bin"),
            ("lib", "../bin"),
            ("/usr/lib", "bin"),
            ("lib/../../x", "bin"),
        ] {
            let err = CompiledRule::compile(CopyRule::new("*.so", dst, src)).unwrap_err();
            assert!(
                matches!(err, RecipeError::PathEscapesRoot { .. }),
                "{src} -> {dst}"
            );
        }
        assert!(ensure_relative("").is_ok());
        assert!(ensure_relative("./include/ventura").is_ok());
    }
}
