//! Application-wide constants.

/// Maximum length of the free-text input, in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Minimum length of the free-text input when text is provided at all.
pub const MIN_TEXT_LENGTH: usize = 10;

/// Maximum number of files accepted per submission.
pub const MAX_FILE_COUNT: usize = 10;

/// Maximum size of a single uploaded file (20 MB).
pub const MAX_FILE_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Content types accepted for uploaded files.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Default number of records returned by the history query.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Display title used when the model leaves `product_overview.title` empty.
pub const UNTITLED_PROMPT_TITLE: &str = "Untitled Prompt";

/// Returns true for content types the gateway can receive as inline image parts.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}
