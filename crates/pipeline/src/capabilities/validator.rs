//! Default photo validator backed by the domain rules in `persona_core`.

use async_trait::async_trait;
use persona_core::error::CoreError;
use persona_core::photos::{validate_photos, Photo, PhotoSource};

use super::{CapabilityError, PhotoValidator};

/// Applies the resolution, format, and URL rules from
/// [`persona_core::photos`].
#[derive(Debug, Default)]
pub struct StrictPhotoValidator;

#[async_trait]
impl PhotoValidator for StrictPhotoValidator {
    async fn validate(&self, photos: &[PhotoSource]) -> Result<Vec<Photo>, CapabilityError> {
        validate_photos(photos).map_err(|err| match err {
            CoreError::Validation(message) => CapabilityError::Invalid(message),
            other => CapabilityError::Invalid(other.to_string()),
        })
    }
}
