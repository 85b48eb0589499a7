//! Editor Integration Tests
//!
//! Drive a `CurriculumEditor` through a learner's session the way a host
//! would: load, edit, check sections, watch events, save.

#[cfg(test)]
mod editor_integration_tests {
    use anyhow::Result;
    use curriculum_core::{
        CompletionState, CurriculumConfig, CurriculumEditor, CurriculumEvent, InMemorySink,
        InsertLocation, MoveDirection, NodeUpdate,
    };
    use serde_json::json;
    use tokio::time::{timeout, Duration};

    fn open_course() -> Result<CurriculumEditor> {
        let editor = CurriculumEditor::from_document(
            json!({
                "roots": ["s1", "s2"],
                "nodes": {
                    "s1": {"id": "s1", "title": "Intro", "subsections": ["s1a", "s1b"]},
                    "s1a": {"id": "s1a", "title": "Setup"},
                    "s1b": {"id": "s1b", "title": "First program"},
                    "s2": {"id": "s2", "title": "Wrap-up"}
                }
            }),
            CompletionState::default(),
            CurriculumConfig::default(),
        )?;
        Ok(editor)
    }

    #[tokio::test]
    async fn test_learner_walks_through_course() -> Result<()> {
        let editor = open_course()?;

        let mut visited = Vec::new();
        while let Some(path) = editor.continue_path().await? {
            let leaf = path.last().cloned().unwrap_or_default();
            visited.push(leaf.clone());
            assert!(editor.toggle_check(&leaf).await?);
        }

        assert_eq!(visited, vec!["s1a", "s1b", "s2"]);
        assert!(editor.progress().await.is_finished());
        assert!(editor.is_complete("s1").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_new_section_reopens_finished_parent() -> Result<()> {
        let editor = open_course()?;
        editor.toggle_check("s1a").await?;
        editor.toggle_check("s1b").await?;
        assert!(editor.is_complete("s1").await?);

        let added = editor.insert_section(InsertLocation::Below, "s1b").await?;

        assert!(!editor.is_complete("s1").await?);
        assert_eq!(
            editor.continue_path().await?,
            Some(vec!["s1".to_string(), added])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_each_operation_emits_one_event() -> Result<()> {
        let editor = open_course()?;
        let mut rx = editor.subscribe();

        editor.move_section("s2", MoveDirection::Up).await?;
        editor
            .update_node("s2", NodeUpdate::new().with_quiz(Some("quiz-7".to_string())))
            .await?;
        editor.delete_section("s1").await?;

        let mut received = Vec::new();
        for _ in 0..3 {
            let event = timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("Event should be emitted within 1 second")
                .expect("Should receive event");
            received.push(event);
        }

        assert!(matches!(received[0], CurriculumEvent::NodeMoved { .. }));
        assert!(matches!(received[1], CurriculumEvent::NodeUpdated { .. }));
        match &received[2] {
            CurriculumEvent::NodeDeleted { node_id, removed } => {
                assert_eq!(node_id, "s1");
                assert_eq!(removed.len(), 3);
            }
            other => panic!("Expected NodeDeleted event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_snapshot_reloads_to_same_state() -> Result<()> {
        let editor = open_course()?;
        let sink = InMemorySink::new();

        editor.insert_section(InsertLocation::Subsection, "s2").await?;
        editor.toggle_check("s1a").await?;
        editor.save(&sink).await?;

        let saved = sink.latest().expect("snapshot saved");
        let document = serde_json::to_value(&saved.forest)?;
        let reopened = CurriculumEditor::from_document(
            document,
            saved.completion.clone(),
            CurriculumConfig::default(),
        )?;

        let reopened_snapshot = reopened.snapshot().await;
        assert_eq!(reopened_snapshot.forest, saved.forest);
        assert_eq!(reopened.continue_path().await?, editor.continue_path().await?);
        Ok(())
    }
}
