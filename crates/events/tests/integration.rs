//! Integration tests for events

#[cfg(test)]
mod tests {
    use pkgrecipe_events::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_warning_with_context("no files matched", "ventura/0.8");
        tx.emit_debug_with_context(
            "locating requirements",
            HashMap::from([("cache".to_string(), "/var/cache/recipes".to_string())]),
        );

        let first = rx.recv().await.unwrap();
        match &first.event {
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                assert_eq!(message, "no files matched");
                assert_eq!(context.as_deref(), Some("ventura/0.8"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(first.meta.level, EventLevel::Warn);
        assert_eq!(first.meta.source, EventSource::GENERAL);
        assert!(first.meta.correlation_id.is_none());

        let second = rx.recv().await.unwrap();
        match &second.event {
            AppEvent::General(GeneralEvent::DebugLog { context, .. }) => {
                assert_eq!(context["cache"], "/var/cache/recipes");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(second.meta.level, EventLevel::Debug);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[test]
    fn test_recipe_event_levels() {
        let copied = AppEvent::Recipe(RecipeEvent::FileCopied {
            phase: RecipePhase::Imports,
            source: PathBuf::from("bin/foo.dll"),
            destination: PathBuf::from("bin/foo.dll"),
        });
        assert_eq!(copied.log_level(), tracing::Level::DEBUG);
        assert_eq!(copied.event_source(), EventSource::RECIPE);

        let completed = AppEvent::Recipe(RecipeEvent::PhaseCompleted {
            package: "ventura/0.8".into(),
            phase: RecipePhase::Package,
            copied: 3,
            unchanged: 0,
        });
        assert_eq!(completed.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&RecipePhase::Imports).unwrap();
        assert_eq!(json, r#""imports""#);
        assert_eq!(RecipePhase::Package.to_string(), "package");
    }
}
