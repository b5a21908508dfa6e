//! The structured refinement extracted from a submission's input.
//!
//! Everything here deserializes tolerantly: the JSON comes from an external
//! model, so missing collections become empty, missing strings become empty,
//! and fields the post-processor overwrites anyway (id, timestamp,
//! source_types, confidence_score) fall back to defaults instead of failing
//! the whole parse. Untyped JSON never travels past this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::constants::UNTITLED_PROMPT_TITLE;
use crate::models::submission::InputType;

/// Accept any string for `metadata.id`; the model's id is discarded by the
/// post-processor, so an unparseable value degrades to nil instead of erroring.
fn lenient_uuid<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_str().and_then(|s| Uuid::parse_str(s).ok()))
        .unwrap_or_else(Uuid::nil))
}

/// Accept any value for `metadata.timestamp`; overwritten by the post-processor.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| {
            v.as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
        .unwrap_or_else(default_timestamp))
}

/// Keep only recognizable source type strings; recomputed by the post-processor.
fn lenient_source_types<'de, D>(deserializer: D) -> Result<Vec<InputType>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.as_str().and_then(|s| s.parse().ok()))
        .collect())
}

/// Accept integers or floats for the confidence score; non-numbers become 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .map(|f| f.round() as i32)
        .unwrap_or(0))
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedPromptMetadata {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Uuid,
    #[serde(default = "default_timestamp", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_source_types")]
    pub source_types: Vec<InputType>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub confidence_score: i32,
}

impl Default for RefinedPromptMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            timestamp: default_timestamp(),
            source_types: Vec::new(),
            confidence_score: 0,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProductOverview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_users: String,
    #[serde(default)]
    pub problem_statement: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub functional: Vec<String>,
    #[serde(default)]
    pub non_functional: Vec<String>,
    #[serde(default)]
    pub priority_ranked: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub business: Vec<String>,
    /// Empty means "not specified".
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Deliverables {
    #[serde(default)]
    pub expected_outputs: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ValidationFlags {
    #[serde(default)]
    pub missing_sections: Vec<String>,
    #[serde(default)]
    pub ambiguous_items: Vec<String>,
    #[serde(default)]
    pub confidence_notes: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RefinedPrompt {
    #[serde(default)]
    pub metadata: RefinedPromptMetadata,
    #[serde(default)]
    pub product_overview: ProductOverview,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub deliverables: Deliverables,
    #[serde(default)]
    pub validation_flags: ValidationFlags,
}

impl RefinedPrompt {
    /// True when the extraction reported no gaps: both validation flag lists
    /// are empty.
    pub fn validation_passed(&self) -> bool {
        self.validation_flags.missing_sections.is_empty()
            && self.validation_flags.ambiguous_items.is_empty()
    }

    /// Display title for the owning submission.
    pub fn display_title(&self) -> String {
        let title = self.product_overview.title.trim();
        if title.is_empty() {
            UNTITLED_PROMPT_TITLE.to_string()
        } else {
            title.to_string()
        }
    }
}

/// Post-processed refinement ready for persistence.
#[derive(Debug, Clone)]
pub struct FinalizedRefinement {
    pub refined: RefinedPrompt,
    pub title: String,
    pub validation_passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_fill_defaults() {
        let parsed: RefinedPrompt = serde_json::from_value(json!({
            "product_overview": { "title": "Recipe App" }
        }))
        .unwrap();
        assert_eq!(parsed.product_overview.title, "Recipe App");
        assert_eq!(parsed.product_overview.description, "");
        assert!(parsed.requirements.functional.is_empty());
        assert!(!parsed.requirements.priority_ranked);
        assert_eq!(parsed.constraints.timeline, "");
        assert!(parsed.validation_flags.missing_sections.is_empty());
        assert_eq!(parsed.metadata.confidence_score, 0);
    }

    #[test]
    fn test_junk_metadata_does_not_fail_parse() {
        let parsed: RefinedPrompt = serde_json::from_value(json!({
            "metadata": {
                "id": "not-a-uuid",
                "timestamp": "yesterday",
                "source_types": ["text", "hologram", 42],
                "confidence_score": 85.4
            }
        }))
        .unwrap();
        assert!(parsed.metadata.id.is_nil());
        assert_eq!(parsed.metadata.source_types, vec![InputType::Text]);
        assert_eq!(parsed.metadata.confidence_score, 85);
    }

    #[test]
    fn test_validation_passed_requires_both_lists_empty() {
        let mut refined = RefinedPrompt::default();
        assert!(refined.validation_passed());

        refined.validation_flags.missing_sections = vec!["constraints".to_string()];
        assert!(!refined.validation_passed());

        refined.validation_flags.missing_sections.clear();
        refined.validation_flags.ambiguous_items = vec!["timeline".to_string()];
        assert!(!refined.validation_passed());
    }

    #[test]
    fn test_display_title_fallback() {
        let mut refined = RefinedPrompt::default();
        assert_eq!(refined.display_title(), "Untitled Prompt");

        refined.product_overview.title = "  ".to_string();
        assert_eq!(refined.display_title(), "Untitled Prompt");

        refined.product_overview.title = "Inventory Tracker".to_string();
        assert_eq!(refined.display_title(), "Inventory Tracker");
    }

    #[test]
    fn test_serde_round_trip_is_structurally_identical() {
        let refined: RefinedPrompt = serde_json::from_value(json!({
            "metadata": {
                "id": Uuid::new_v4().to_string(),
                "timestamp": "2026-03-01T12:00:00Z",
                "source_types": ["text", "image"],
                "confidence_score": 85
            },
            "product_overview": {
                "title": "Recipe App",
                "description": "Meal planning for families",
                "target_users": "Home cooks",
                "problem_statement": "Weeknight dinners are chaotic"
            },
            "requirements": {
                "functional": ["browse recipes", "weekly plan"],
                "non_functional": ["works offline"],
                "priority_ranked": true
            },
            "constraints": {
                "technical": ["mobile first"],
                "business": ["launch before Q3"],
                "timeline": "3 months"
            },
            "deliverables": {
                "expected_outputs": ["iOS app"],
                "success_criteria": ["1000 weekly users"]
            },
            "validation_flags": {
                "missing_sections": [],
                "ambiguous_items": [],
                "confidence_notes": "clear input"
            }
        }))
        .unwrap();

        let exported = serde_json::to_value(&refined).unwrap();
        let reparsed: RefinedPrompt = serde_json::from_value(exported.clone()).unwrap();
        assert_eq!(exported, serde_json::to_value(&reparsed).unwrap());
    }
}
