//! Post-processing of a parsed refinement before persistence.
//!
//! The model's own metadata is never trusted: id, timestamp, and source
//! types are overwritten from what the server actually saw, and the
//! confidence score is clamped into range.

use chrono::Utc;
use uuid::Uuid;

use promptforge_core::models::refined::{FinalizedRefinement, RefinedPrompt};
use promptforge_core::models::submission::StoredFile;

use crate::normalize::derive_source_types;

/// Overwrite the server-owned metadata fields and derive the persisted
/// title and validation verdict.
pub fn finalize(
    mut refined: RefinedPrompt,
    text: &str,
    files: &[StoredFile],
) -> FinalizedRefinement {
    refined.metadata.id = Uuid::new_v4();
    refined.metadata.timestamp = Utc::now();
    refined.metadata.source_types = derive_source_types(text, files);
    refined.metadata.confidence_score = refined.metadata.confidence_score.clamp(0, 100);

    let title = refined.display_title();
    let validation_passed = refined.validation_passed();

    FinalizedRefinement {
        refined,
        title,
        validation_passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptforge_core::models::submission::InputType;

    #[test]
    fn test_server_overwrites_model_metadata() {
        let mut refined = RefinedPrompt::default();
        refined.metadata.id = Uuid::nil();
        refined.metadata.source_types = vec![InputType::Document];
        refined.metadata.confidence_score = 85;

        let finalized = finalize(refined, "some text", &[]);
        assert_ne!(finalized.refined.metadata.id, Uuid::nil());
        assert_eq!(finalized.refined.metadata.source_types, vec![InputType::Text]);
        assert_eq!(finalized.refined.metadata.confidence_score, 85);
    }

    #[test]
    fn test_score_is_clamped() {
        let mut refined = RefinedPrompt::default();
        refined.metadata.confidence_score = 140;
        assert_eq!(finalize(refined, "t", &[]).refined.metadata.confidence_score, 100);

        let mut refined = RefinedPrompt::default();
        refined.metadata.confidence_score = -3;
        assert_eq!(finalize(refined, "t", &[]).refined.metadata.confidence_score, 0);
    }

    #[test]
    fn test_title_falls_back_when_blank() {
        let finalized = finalize(RefinedPrompt::default(), "t", &[]);
        assert_eq!(finalized.title, "Untitled Prompt");

        let mut refined = RefinedPrompt::default();
        refined.product_overview.title = "  Recipe App  ".to_string();
        assert_eq!(finalize(refined, "t", &[]).title, "Recipe App");
    }

    #[test]
    fn test_validation_verdict() {
        let finalized = finalize(RefinedPrompt::default(), "t", &[]);
        assert!(finalized.validation_passed);

        let mut refined = RefinedPrompt::default();
        refined.validation_flags.ambiguous_items = vec!["target users".to_string()];
        assert!(!finalize(refined, "t", &[]).validation_passed);
    }
}
