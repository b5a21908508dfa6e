//! Submit-input validation
//!
//! Enforces the caller-side preconditions of the submit operation: at least
//! one of text or files, text length bounds, file count/size bounds, and the
//! content type allowlist.

use crate::constants::{
    ALLOWED_CONTENT_TYPES, MAX_FILE_COUNT, MAX_FILE_SIZE_BYTES, MAX_TEXT_LENGTH, MIN_TEXT_LENGTH,
};
use crate::error::AppError;

/// File attributes checked before any upload happens.
#[derive(Debug, Clone)]
pub struct FileCheck<'a> {
    pub name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: usize,
}

/// Validate the raw submit input. Returns the first violation found.
pub fn validate_submit_input(text: &str, files: &[FileCheck<'_>]) -> Result<(), AppError> {
    let trimmed = text.trim();

    if trimmed.is_empty() && files.is_empty() {
        return Err(AppError::InvalidInput(
            "Provide text or at least one file".to_string(),
        ));
    }

    if !trimmed.is_empty() && trimmed.chars().count() < MIN_TEXT_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Text input must be at least {} characters",
            MIN_TEXT_LENGTH
        )));
    }

    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Text input exceeds the maximum of {} characters",
            MAX_TEXT_LENGTH
        )));
    }

    if files.len() > MAX_FILE_COUNT {
        return Err(AppError::InvalidInput(format!(
            "At most {} files are accepted per submission",
            MAX_FILE_COUNT
        )));
    }

    for file in files {
        if file.size_bytes > MAX_FILE_SIZE_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "File {} exceeds the {} MB limit",
                file.name,
                MAX_FILE_SIZE_BYTES / (1024 * 1024)
            )));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&file.content_type) {
            return Err(AppError::InvalidInput(format!(
                "File {} has unsupported content type {}",
                file.name, file.content_type
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size_bytes: usize) -> FileCheck<'_> {
        FileCheck {
            name,
            content_type: "image/png",
            size_bytes,
        }
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = validate_submit_input("", &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_short_text() {
        assert!(validate_submit_input("too short", &[]).is_err());
        assert!(validate_submit_input("long enough text input", &[]).is_ok());
    }

    #[test]
    fn test_files_alone_are_sufficient() {
        assert!(validate_submit_input("", &[png("a.png", 1024)]).is_ok());
    }

    #[test]
    fn test_rejects_oversized_text() {
        let text = "x".repeat(MAX_TEXT_LENGTH + 1);
        assert!(validate_submit_input(&text, &[]).is_err());
    }

    #[test]
    fn test_rejects_too_many_files() {
        let files: Vec<FileCheck<'_>> = (0..MAX_FILE_COUNT + 1).map(|_| png("a.png", 10)).collect();
        assert!(validate_submit_input("", &files).is_err());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = validate_submit_input("", &[png("big.png", MAX_FILE_SIZE_BYTES + 1)]).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_rejects_disallowed_content_type() {
        let file = FileCheck {
            name: "movie.mp4",
            content_type: "video/mp4",
            size_bytes: 100,
        };
        let err = validate_submit_input("", &[file]).unwrap_err();
        assert!(err.to_string().contains("video/mp4"));
    }

    #[test]
    fn test_accepts_docx() {
        let file = FileCheck {
            name: "spec.docx",
            content_type:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            size_bytes: 4096,
        };
        assert!(validate_submit_input("", &[file]).is_ok());
    }
}
