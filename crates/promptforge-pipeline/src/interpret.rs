//! Interpretation of the raw gateway completion: strip code fences, parse
//! JSON, and split the result into refined / rejected / malformed.

use promptforge_core::models::refined::RefinedPrompt;

/// Error message recorded when the completion cannot be interpreted.
pub const PARSE_ERROR_MESSAGE: &str = "Failed to parse AI response";

/// Fallback rejection reason when the model rejects without giving one.
const DEFAULT_REJECTION_REASON: &str = "Input rejected";

/// What the model's completion turned out to be.
#[derive(Debug)]
pub enum Interpretation {
    /// The model judged the input off-topic or unusable.
    Rejected { reason: String },
    /// A structured refinement, still carrying model-supplied metadata.
    Refined(Box<RefinedPrompt>),
    /// Not JSON, or JSON without a recognizable shape.
    Malformed,
}

/// Remove markdown code fence markers the model sometimes wraps its JSON in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Interpret a raw completion.
///
/// A JSON object with `"rejected": true` is a rejection; the optional
/// `"reason"` string travels with it. Otherwise the object must carry a
/// `"refinedPrompt"` object. Anything else is malformed, including valid
/// JSON of the wrong shape.
pub fn interpret(raw: &str) -> Interpretation {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Completion is not valid JSON");
            return Interpretation::Malformed;
        }
    };

    if value.get("rejected").and_then(|v| v.as_bool()) == Some(true) {
        let reason = value
            .get("reason")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_REJECTION_REASON)
            .to_string();
        return Interpretation::Rejected { reason };
    }

    let Some(refined_value) = value.get("refinedPrompt") else {
        tracing::warn!("Completion JSON has neither rejected flag nor refinedPrompt");
        return Interpretation::Malformed;
    };

    match serde_json::from_value::<RefinedPrompt>(refined_value.clone()) {
        Ok(refined) => Interpretation::Refined(Box::new(refined)),
        Err(e) => {
            tracing::warn!(error = %e, "refinedPrompt is not an object");
            Interpretation::Malformed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refined_payload() -> String {
        json!({
            "refinedPrompt": {
                "metadata": { "confidence_score": 85 },
                "product_overview": { "title": "Recipe App" },
                "validation_flags": { "missing_sections": [], "ambiguous_items": [] }
            }
        })
        .to_string()
    }

    #[test]
    fn test_plain_json_refinement() {
        match interpret(&refined_payload()) {
            Interpretation::Refined(refined) => {
                assert_eq!(refined.product_overview.title, "Recipe App");
                assert_eq!(refined.metadata.confidence_score, 85);
            }
            other => panic!("expected refined, got {:?}", other),
        }
    }

    #[test]
    fn test_fenced_json_refinement() {
        let fenced = format!("```json\n{}\n```", refined_payload());
        assert!(matches!(interpret(&fenced), Interpretation::Refined(_)));
    }

    #[test]
    fn test_rejection_with_reason() {
        let raw = json!({ "rejected": true, "reason": "Not a product description" }).to_string();
        match interpret(&raw) {
            Interpretation::Rejected { reason } => {
                assert_eq!(reason, "Not a product description");
            }
            other => panic!("expected rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_rejection_without_reason_uses_fallback() {
        let raw = json!({ "rejected": true }).to_string();
        match interpret(&raw) {
            Interpretation::Rejected { reason } => assert_eq!(reason, "Input rejected"),
            other => panic!("expected rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_false_without_refinement_is_malformed() {
        let raw = json!({ "rejected": false }).to_string();
        assert!(matches!(interpret(&raw), Interpretation::Malformed));
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(
            interpret("Sure! Here is your refined prompt."),
            Interpretation::Malformed
        ));
    }

    #[test]
    fn test_wrong_shape_json_is_malformed() {
        assert!(matches!(interpret("[1, 2, 3]"), Interpretation::Malformed));
        let raw = json!({ "refinedPrompt": "not an object" }).to_string();
        assert!(matches!(interpret(&raw), Interpretation::Malformed));
    }
}
