//! Recipe and descriptor error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RecipeError {
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("source directory not found: {path}")]
    MissingSourceDirectory { path: String },

    #[error("path escapes its root: {path}")]
    PathEscapesRoot { path: String },

    #[error("invalid dependency reference `{reference}`: {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("recipe parse error: {message}")]
    ParseError { message: String },
}

impl RecipeError {
    /// Build an `InvalidPattern` error from a globset failure
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, err: &globset::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.kind().to_string(),
        }
    }
}

impl UserFacingError for RecipeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPattern { .. } => {
                Some("Use glob syntax such as `*.hpp`, `**/*.h` or `*.dylib*`.")
            }
            Self::MissingSourceDirectory { .. } => {
                Some("Run the build step first or fix the rule's `src` directory.")
            }
            Self::PathEscapesRoot { .. } => {
                Some("Rule directories must stay inside their root: no `..` and no symlinks leading out.")
            }
            Self::InvalidReference { .. } => {
                Some("Requirements take the form `name/version@owner/channel`.")
            }
            Self::MissingField { .. } | Self::ParseError { .. } => {
                Some("Check the recipe file against the documented layout.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidPattern { .. } => "recipe.invalid_pattern",
            Self::MissingSourceDirectory { .. } => "recipe.missing_source_directory",
            Self::PathEscapesRoot { .. } => "recipe.path_escapes_root",
            Self::InvalidReference { .. } => "recipe.invalid_reference",
            Self::MissingField { .. } => "recipe.missing_field",
            Self::ParseError { .. } => "recipe.parse_error",
        };
        Some(code)
    }
}
