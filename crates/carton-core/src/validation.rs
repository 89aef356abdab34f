//! Input validation helpers shared by the engine and the API layer.

use crate::constants::MAX_FILENAME_LENGTH;
use crate::error::AppError;

/// Parse a raw comma-separated email list: split on `,`, trim, drop empties,
/// lowercase. Duplicates survive here; set union absorbs them downstream.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validate a candidate display name for rename. Must be non-empty after
/// trimming and within the length bound; returns the trimmed name.
pub fn validate_display_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "File name cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "File name cannot exceed {} characters",
            MAX_FILENAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an uploaded file's size against the policy bound.
pub fn validate_file_size(size_bytes: u64, max_bytes: u64) -> Result<(), AppError> {
    if size_bytes > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_bytes / 1024 / 1024
        )));
    }
    Ok(())
}

/// Split a filename into (display name, extension). Files without a dot, or
/// dotfiles like `.env`, have an empty extension.
pub fn split_filename(filename: &str) -> (String, String) {
    match filename.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() => (name.to_string(), ext.to_lowercase()),
        _ => (filename.to_string(), String::new()),
    }
}

/// Sanitize a filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_list_trims_and_lowercases() {
        assert_eq!(
            parse_email_list(" X@Y.com , z@w.com ,, "),
            vec!["x@y.com".to_string(), "z@w.com".to_string()]
        );
        assert!(parse_email_list("").is_empty());
        assert!(parse_email_list(" , ,").is_empty());
    }

    #[test]
    fn test_parse_email_list_keeps_duplicates_for_set_union() {
        assert_eq!(
            parse_email_list("x@y.com, x@y.com, z@w.com"),
            vec!["x@y.com", "x@y.com", "z@w.com"]
        );
    }

    #[test]
    fn test_validate_display_name() {
        assert_eq!(validate_display_name("  report ").unwrap(), "report");
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(100, 100).is_ok());
        assert!(matches!(
            validate_file_size(101, 100),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_split_filename() {
        assert_eq!(
            split_filename("report.pdf"),
            ("report".to_string(), "pdf".to_string())
        );
        assert_eq!(
            split_filename("archive.tar.GZ"),
            ("archive.tar".to_string(), "gz".to_string())
        );
        assert_eq!(
            split_filename("README"),
            ("README".to_string(), String::new())
        );
        assert_eq!(split_filename(".env"), (".env".to_string(), String::new()));
    }

    #[test]
    fn test_sanitize_filename_rejects_path_traversal() {
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("foo/..").is_err());
        assert!(sanitize_filename("....").is_err());
    }

    #[test]
    fn test_sanitize_filename_accepts_valid_names() {
        assert_eq!(sanitize_filename("image.png").unwrap(), "image.png");
        assert_eq!(sanitize_filename("my-file_1.jpg").unwrap(), "my-file_1.jpg");
        assert_eq!(sanitize_filename("with space.txt").unwrap(), "with_space.txt");
    }
}
