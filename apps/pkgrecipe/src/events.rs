//! Event handling and user feedback

use crate::logging::log_event_with_tracing;
use console::Style;
use pkgrecipe_events::{AppEvent, EventMessage, GeneralEvent, RecipeEvent};

/// Event handler for terminal feedback
pub struct EventHandler {
    /// Whether to use colors in output
    colors_enabled: bool,
    /// Print per-file lines as well as warnings
    verbose: bool,
    /// Suppress terminal output entirely (JSON mode)
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            verbose,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }

        match &message.event {
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                let text = match context {
                    Some(context) => format!("Warning: {message} ({context})"),
                    None => format!("Warning: {message}"),
                };
                eprintln!("{}", self.paint(&text, &Style::new().yellow()));
            }
            AppEvent::Recipe(RecipeEvent::FileCopied {
                phase, destination, ..
            }) if self.verbose => {
                eprintln!(
                    "{} {}",
                    self.paint(phase.as_str(), &Style::new().cyan()),
                    destination.display()
                );
            }
            AppEvent::Recipe(RecipeEvent::SourceSkipped { phase, path }) if self.verbose => {
                eprintln!(
                    "{} skipped missing {}",
                    self.paint(phase.as_str(), &Style::new().dim()),
                    path.display()
                );
            }
            _ => {}
        }
    }

    fn paint(&self, text: &str, style: &Style) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
