//! Package identity and dependency reference types

use pkgrecipe_errors::RecipeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters that would turn a pinned reference into a range or wildcard
const RANGE_CHARS: &[char] = &['*', '?', '[', ']', '<', '>', '=', '^', '~', ',', '|'];

/// Unique identifier for a published package instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    /// Create a new package ID
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Fully pinned reference to one external package instance
///
/// Parsed from `name/version@owner/channel`. The `channel` field keeps the
/// `owner/channel` pair together since hosts treat it as one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    pub package_name: String,
    pub version: String,
    pub channel: String,
}

impl DependencyRef {
    /// Parse a dependency reference (e.g., "silicium/0.12@TyRoXx/stable")
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::InvalidReference` if the string does not have
    /// exactly four non-empty segments or contains range/wildcard syntax.
    pub fn parse(s: &str) -> Result<Self, RecipeError> {
        let invalid = |reason: &str| RecipeError::InvalidReference {
            reference: s.to_string(),
            reason: reason.to_string(),
        };

        let s_trim = s.trim();
        if s_trim.is_empty() {
            return Err(invalid("empty reference"));
        }
        if s_trim.contains(char::is_whitespace) {
            return Err(invalid("whitespace is not allowed"));
        }
        if s_trim.contains(RANGE_CHARS) {
            return Err(invalid("version ranges and wildcards are not supported"));
        }

        let (package, namespace) = s_trim
            .split_once('@')
            .ok_or_else(|| invalid("expected `@owner/channel`"))?;
        if namespace.contains('@') {
            return Err(invalid("more than one `@`"));
        }

        let (package_name, version) =
            split_pair(package).ok_or_else(|| invalid("expected `name/version` before `@`"))?;
        let (owner, channel) =
            split_pair(namespace).ok_or_else(|| invalid("expected `owner/channel` after `@`"))?;

        Ok(Self {
            package_name: package_name.to_string(),
            version: version.to_string(),
            channel: format!("{owner}/{channel}"),
        })
    }

    /// The publisher half of the channel
    #[must_use]
    pub fn owner(&self) -> &str {
        self.channel
            .split_once('/')
            .map_or(self.channel.as_str(), |(owner, _)| owner)
    }

    /// The maintenance-stream half of the channel
    #[must_use]
    pub fn channel_name(&self) -> &str {
        self.channel
            .split_once('/')
            .map_or("", |(_, channel)| channel)
    }

    /// The package instance this reference pins
    #[must_use]
    pub fn id(&self) -> PackageId {
        PackageId::new(&self.package_name, &self.version)
    }
}

/// Split `a/b` into two non-empty halves
fn split_pair(s: &str) -> Option<(&str, &str)> {
    let (a, b) = s.split_once('/')?;
    if a.is_empty() || b.is_empty() || b.contains('/') {
        return None;
    }
    Some((a, b))
}

impl FromStr for DependencyRef {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.package_name, self.version, self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_ref_parse() {
        let dep = DependencyRef::parse("silicium/0.12@TyRoXx/stable").unwrap();
        assert_eq!(dep.package_name, "silicium");
        assert_eq!(dep.version, "0.12");
        assert_eq!(dep.channel, "TyRoXx/stable");
        assert_eq!(dep.owner(), "TyRoXx");
        assert_eq!(dep.channel_name(), "stable");
        assert_eq!(dep.id(), PackageId::new("silicium", "0.12"));
    }

    #[test]
    fn test_dependency_ref_rejects_malformed() {
        for input in [
            "",
            "silicium",
            "silicium/0.12",
            "silicium@TyRoXx/stable",
            "silicium/0.12@TyRoXx",
            "/0.12@TyRoXx/stable",
            "silicium/@TyRoXx/stable",
            "silicium/0.12@/stable",
            "silicium/0.12@TyRoXx/stable/extra",
            "silicium/0.12@TyRoXx@other/stable",
        ] {
            assert!(
                matches!(
                    DependencyRef::parse(input),
                    Err(RecipeError::InvalidReference { .. })
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_dependency_ref_rejects_ranges() {
        assert!(DependencyRef::parse("silicium/[>0.10]@TyRoXx/stable").is_err());
        assert!(DependencyRef::parse("silicium/*@TyRoXx/stable").is_err());
        assert!(DependencyRef::parse("silicium/0.12 @TyRoXx/stable").is_err());
    }

    #[test]
    fn test_package_id_display() {
        let id = PackageId::new("ventura", "0.8");
        assert_eq!(id.to_string(), "ventura/0.8");
    }
}
