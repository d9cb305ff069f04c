//! Dependency location error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ResolveError {
    #[error("dependency unresolved: {reference}")]
    DependencyUnresolved { reference: String },
}

impl UserFacingError for ResolveError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DependencyUnresolved { .. } => Some(
                "Build or fetch the dependency into the local cache, or pass its root with --root.",
            ),
        }
    }

    fn is_retryable(&self) -> bool {
        // the host may populate the cache and rerun the phase
        true
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::DependencyUnresolved { .. } => Some("resolve.dependency_unresolved"),
        }
    }
}
