//! CLI error handling

use std::fmt;

use pkgrecipe_errors::UserFacingError;
use pkgrecipe_events::FailureContext;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Recipe, resolve, config or I/O error from the library crates
    Recipe(pkgrecipe_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Structured form used for `--json` error output
    pub fn failure(&self) -> FailureContext {
        match self {
            CliError::Recipe(e) => FailureContext::from_error(e),
            CliError::Io(_) => {
                FailureContext::new(None::<String>, self.to_string(), None::<String>, false)
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Recipe(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Recipe(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<pkgrecipe_errors::Error> for CliError {
    fn from(e: pkgrecipe_errors::Error) -> Self {
        CliError::Recipe(e)
    }
}

impl From<pkgrecipe_errors::RecipeError> for CliError {
    fn from(e: pkgrecipe_errors::RecipeError) -> Self {
        CliError::Recipe(e.into())
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Recipe(pkgrecipe_errors::Error::internal(format!(
            "blocking task failed: {e}"
        )))
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_task_is_internal_error() {
        let join_error = tokio::task::spawn(async { panic!("boom") })
            .await
            .unwrap_err();

        let failure = CliError::from(join_error).failure();
        assert_eq!(failure.code.as_deref(), Some("error.internal"));
        assert!(failure.message.contains("blocking task failed"));
    }
}
