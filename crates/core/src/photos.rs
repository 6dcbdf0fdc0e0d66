//! Source photo model and validation rules.
//!
//! Validation is pure: it inspects the submitted payload shape only and
//! never touches the network or filesystem. The rules mirror what the
//! ingestion stage enforces before any job state changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// File extensions accepted as avatar source photos.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Minimum width and height, in pixels, for a usable source photo.
pub const MIN_RESOLUTION_PX: u32 = 256;

/// A photo as submitted by the client, prior to validation.
///
/// All fields are lenient so that a malformed payload deserializes and
/// fails with a domain validation message instead of a serde error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoSource {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A validated source photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub metadata: HashMap<String, String>,
}

/// Validate a batch of submitted photos.
///
/// Fails when the list is empty, any photo is missing a URL, has a
/// disallowed file extension, or is below [`MIN_RESOLUTION_PX`] in
/// either dimension. Error messages identify the offending photo.
pub fn validate_photos(photos: &[PhotoSource]) -> Result<Vec<Photo>, CoreError> {
    if photos.is_empty() {
        return Err(CoreError::Validation(
            "At least one photo is required to generate an avatar".to_string(),
        ));
    }

    let mut validated = Vec::with_capacity(photos.len());
    for (index, source) in photos.iter().enumerate() {
        let url = source.url.trim();
        if url.is_empty() {
            return Err(CoreError::Validation(format!(
                "Photo #{} is missing a URL",
                index + 1
            )));
        }

        if !has_allowed_extension(url) {
            return Err(CoreError::Validation(format!(
                "Unsupported image format for {url}"
            )));
        }

        if source.width < MIN_RESOLUTION_PX || source.height < MIN_RESOLUTION_PX {
            return Err(CoreError::Validation(format!(
                "Photo {url} is below the minimum resolution of {MIN_RESOLUTION_PX}px"
            )));
        }

        validated.push(Photo {
            url: url.to_string(),
            width: source.width,
            height: source.height,
            metadata: source.metadata.clone(),
        });
    }

    Ok(validated)
}

/// Check the URL path's file extension against [`ALLOWED_EXTENSIONS`].
///
/// Query strings and fragments are ignored when deriving the extension.
fn has_allowed_extension(url: &str) -> bool {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);
    match path.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(url: &str, width: u32, height: u32) -> PhotoSource {
        PhotoSource {
            url: url.to_string(),
            width,
            height,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        let photos = [photo("https://example.com/photo.jpg", 512, 512)];
        let validated = validate_photos(&photos).unwrap();
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].url, "https://example.com/photo.jpg");
    }

    #[test]
    fn rejects_empty_list() {
        let err = validate_photos(&[]).unwrap_err();
        assert!(err.to_string().contains("At least one photo"));
    }

    #[test]
    fn rejects_missing_url() {
        let err = validate_photos(&[photo("", 512, 512)]).unwrap_err();
        assert!(err.to_string().contains("missing a URL"));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = validate_photos(&[photo("https://example.com/photo.gif", 512, 512)])
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported image format"));
    }

    #[test]
    fn rejects_low_resolution() {
        let err = validate_photos(&[photo("https://example.com/photo.jpg", 64, 64)])
            .unwrap_err();
        assert!(err.to_string().contains("minimum resolution"));
    }

    #[test]
    fn rejects_when_only_one_dimension_is_too_small() {
        let err = validate_photos(&[photo("https://example.com/photo.jpg", 512, 128)])
            .unwrap_err();
        assert!(err.to_string().contains("minimum resolution"));
    }

    #[test]
    fn extension_check_ignores_query_string() {
        let photos = [photo("https://example.com/photo.jpeg?size=large", 512, 512)];
        assert!(validate_photos(&photos).is_ok());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let photos = [photo("https://example.com/PHOTO.PNG", 512, 512)];
        assert!(validate_photos(&photos).is_ok());
    }
}
