//! Input normalization: turn a submission's raw text and uploaded files into
//! the ordered content parts sent to the completion gateway, and classify the
//! submission's input type.

use promptforge_core::constants::is_image_content_type;
use promptforge_core::models::submission::{InputType, StoredFile};
use promptforge_gateway::ContentPart;

/// Trailing instruction appended after all input parts. The system prompt
/// already carries the schema; this pins the output format.
const OUTPUT_INSTRUCTION: &str = "\n\nAnalyze the above input and return ONLY valid JSON following the schema in your instructions. No markdown, no explanation, just JSON.";

/// Build the content parts for a gateway request, in input order: text first,
/// then one entry per file, then the output instruction.
///
/// Images contribute an image-url part followed by a text label; documents
/// contribute a text reference (the gateway never fetches document bytes).
/// Returns an empty vec when there is nothing to send, in which case the
/// caller must not make a gateway call.
pub fn normalize_input(text: &str, files: &[StoredFile]) -> Vec<ContentPart> {
    let mut parts = Vec::new();

    if !text.trim().is_empty() {
        parts.push(ContentPart::text(format!("TEXT INPUT:\n{}", text)));
    }

    for file in files {
        if is_image_content_type(&file.content_type) {
            parts.push(ContentPart::image_url(file.url.clone()));
            parts.push(ContentPart::text(format!("[Image: {}]", file.name)));
        } else {
            parts.push(ContentPart::text(format!(
                "[Document attached: {} ({}). URL: {}]",
                file.name, file.content_type, file.url
            )));
        }
    }

    if parts.is_empty() {
        return parts;
    }

    parts.push(ContentPart::text(OUTPUT_INSTRUCTION));
    parts
}

/// Classify a submission from its actual inputs, with precedence
/// mixed > image > document > text. Mixed means text combined with at
/// least one file; files alone classify by the first matching file kind.
pub fn classify_input(text: &str, files: &[StoredFile]) -> InputType {
    let has_text = !text.trim().is_empty();
    let has_images = files.iter().any(|f| is_image_content_type(&f.content_type));
    let has_documents = files.iter().any(|f| !is_image_content_type(&f.content_type));

    if has_text && (has_images || has_documents) {
        InputType::Mixed
    } else if has_images {
        InputType::Image
    } else if has_documents {
        InputType::Document
    } else {
        InputType::Text
    }
}

/// The input types actually present, for `metadata.source_types`. Ordered
/// text, image, document; never contains `mixed`.
pub fn derive_source_types(text: &str, files: &[StoredFile]) -> Vec<InputType> {
    let mut types = Vec::new();
    if !text.trim().is_empty() {
        types.push(InputType::Text);
    }
    if files.iter().any(|f| is_image_content_type(&f.content_type)) {
        types.push(InputType::Image);
    }
    if files.iter().any(|f| !is_image_content_type(&f.content_type)) {
        types.push(InputType::Document);
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image(name: &str) -> StoredFile {
        StoredFile {
            url: format!("https://files.test/{}", name),
            name: name.to_string(),
            content_type: "image/png".to_string(),
        }
    }

    fn document(name: &str) -> StoredFile {
        StoredFile {
            url: format!("https://files.test/{}", name),
            name: name.to_string(),
            content_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_text_only_parts() {
        let parts = normalize_input("Build a recipe app", &[]);
        assert_eq!(parts.len(), 2);
        let first = serde_json::to_value(&parts[0]).unwrap();
        assert_eq!(first["type"], json!("text"));
        assert_eq!(first["text"], json!("TEXT INPUT:\nBuild a recipe app"));
        let last = serde_json::to_value(&parts[1]).unwrap();
        assert!(last["text"]
            .as_str()
            .unwrap()
            .contains("return ONLY valid JSON"));
    }

    #[test]
    fn test_image_contributes_url_then_label() {
        let parts = normalize_input("", &[image("mockup.png")]);
        assert_eq!(parts.len(), 3);
        let first = serde_json::to_value(&parts[0]).unwrap();
        assert_eq!(first["type"], json!("image_url"));
        assert_eq!(
            first["image_url"]["url"],
            json!("https://files.test/mockup.png")
        );
        let second = serde_json::to_value(&parts[1]).unwrap();
        assert_eq!(second["text"], json!("[Image: mockup.png]"));
    }

    #[test]
    fn test_document_is_referenced_not_fetched() {
        let parts = normalize_input("", &[document("brief.pdf")]);
        assert_eq!(parts.len(), 2);
        let first = serde_json::to_value(&parts[0]).unwrap();
        assert_eq!(first["type"], json!("text"));
        assert_eq!(
            first["text"],
            json!("[Document attached: brief.pdf (application/pdf). URL: https://files.test/brief.pdf]")
        );
    }

    #[test]
    fn test_whitespace_only_text_yields_no_parts() {
        assert!(normalize_input("   \n\t", &[]).is_empty());
    }

    #[test]
    fn test_parts_preserve_input_order() {
        let parts = normalize_input("some text", &[image("a.png"), document("b.pdf")]);
        // text, image url, image label, document reference, instruction
        assert_eq!(parts.len(), 5);
    }

    #[test]
    fn test_classification_precedence() {
        assert_eq!(classify_input("hello", &[]), InputType::Text);
        assert_eq!(classify_input("", &[image("a.png")]), InputType::Image);
        assert_eq!(classify_input("", &[document("b.pdf")]), InputType::Document);
        assert_eq!(classify_input("hello", &[image("a.png")]), InputType::Mixed);
        assert_eq!(
            classify_input("hello", &[document("b.pdf")]),
            InputType::Mixed
        );
        // Whitespace-only text does not count as a text source.
        assert_eq!(classify_input("  ", &[image("a.png")]), InputType::Image);
        // Degenerate case: nothing at all still classifies as text.
        assert_eq!(classify_input("", &[]), InputType::Text);
    }

    #[test]
    fn test_files_without_text_never_classify_as_mixed() {
        // Mixed requires text alongside files; an image plus a document
        // on their own resolves by file precedence, image first.
        assert_eq!(
            classify_input("", &[image("a.png"), document("b.pdf")]),
            InputType::Image
        );
        assert_eq!(
            classify_input("  \n", &[document("b.pdf"), document("c.docx")]),
            InputType::Document
        );
    }

    #[test]
    fn test_derived_source_types() {
        assert_eq!(derive_source_types("hello", &[]), vec![InputType::Text]);
        assert_eq!(
            derive_source_types("hello", &[image("a.png"), document("b.pdf")]),
            vec![InputType::Text, InputType::Image, InputType::Document]
        );
        assert!(derive_source_types("", &[]).is_empty());
    }
}
