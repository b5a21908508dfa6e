//! Shared key generation for storage backends.
//!
//! Key format: `prompt-files/{unix_millis}-{filename}`. The millisecond
//! prefix keeps repeated uploads of the same filename from colliding.

use chrono::Utc;

/// Generate a storage key for an uploaded submission file.
///
/// The filename is sanitized to a conservative character set so keys stay
/// valid paths on every backend.
pub fn generate_storage_key(filename: &str) -> String {
    // Keep only the final path component so traversal segments never enter keys.
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim_start_matches('.');
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("prompt-files/{}-{}", Utc::now().timestamp_millis(), safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_has_prefix_and_filename() {
        let key = generate_storage_key("mockup.png");
        assert!(key.starts_with("prompt-files/"));
        assert!(key.ends_with("-mockup.png"));
    }

    #[test]
    fn test_key_sanitizes_awkward_filenames() {
        let key = generate_storage_key("../etc/passwd idea?.pdf");
        assert!(!key.contains(".."));
        assert!(!key.contains('/') || key.matches('/').count() == 1);
        assert!(key.ends_with(".pdf"));
    }
}
