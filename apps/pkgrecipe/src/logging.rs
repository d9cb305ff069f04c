//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so the
//! subscriber (plain or JSON) carries the same data the event channel did.

use pkgrecipe_events::{AppEvent, EventMessage, GeneralEvent, RecipeEvent};
use tracing::{debug, error, info, trace, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Recipe(recipe_event) => match recipe_event {
            RecipeEvent::Declared {
                package,
                requirements,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    package = %package,
                    requirements = ?requirements,
                    "Recipe declared"
                );
            }
            RecipeEvent::PhaseStarted {
                package,
                phase,
                root,
                destination,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    package = %package,
                    phase = %phase,
                    root = %root.display(),
                    destination = %destination.display(),
                    "Phase started"
                );
            }
            RecipeEvent::FileCopied {
                phase,
                source,
                destination,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    phase = %phase,
                    from = %source.display(),
                    to = %destination.display(),
                    "File copied"
                );
            }
            RecipeEvent::FileUnchanged { phase, destination } => {
                trace!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    phase = %phase,
                    to = %destination.display(),
                    "File unchanged"
                );
            }
            RecipeEvent::SourceSkipped { phase, path } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    phase = %phase,
                    path = %path.display(),
                    "Source directory absent"
                );
            }
            RecipeEvent::PhaseCompleted {
                package,
                phase,
                copied,
                unchanged,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    package = %package,
                    phase = %phase,
                    copied = copied,
                    unchanged = unchanged,
                    "Phase completed"
                );
            }
            RecipeEvent::PhaseFailed {
                package,
                phase,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    package = %package,
                    phase = %phase,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Phase failed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
        },
    }
}
