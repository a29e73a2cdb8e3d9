//! Image-content moderation client.
//!
//! Vendor product images are screened by a third-party object-detection
//! service before they are uploaded to storage. The service is consumed as
//! an opaque HTTP interface: one multipart `analyze` call per image, one
//! verdict back. A rejection carries a descriptive message naming the
//! detected (or missing) object, which is surfaced to the vendor verbatim.

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::ModerationConfig;

/// Errors that can occur when calling the moderation service.
///
/// These are transport-level failures; a *rejected image* is not an error,
/// it is an unapproved [`ModerationVerdict`].
#[derive(Debug, Error)]
pub enum ModerationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error response.
    #[error("Moderation service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the verdict.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The moderation service's verdict on one image.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationVerdict {
    /// Whether the image may be listed.
    pub approved: bool,
    /// Human-readable explanation, names the detected object.
    pub message: String,
    /// Everything the detector saw, with confidences.
    #[serde(rename = "detectedObjects", default)]
    pub detected_objects: Vec<String>,
}

/// Client for the image moderation service.
#[derive(Clone)]
pub struct ModerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModerationClient {
    /// Create a new moderation client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ModerationConfig) -> Result<Self, ModerationError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Screen one image; returns the service's verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the verdict cannot be
    /// parsed. Callers treat a transport failure as "cannot list this
    /// image right now", not as approval.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn screen_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ModerationVerdict, ModerationError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ModerationError::Parse(format!("invalid content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModerationError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        response
            .json::<ModerationVerdict>()
            .await
            .map_err(|e| ModerationError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_deserializes_service_shape() {
        let json = r#"{
            "approved": false,
            "message": "Image rejected: does not contain basket",
            "detectedObjects": ["knife (91.20%)", "scissors (64.33%)"]
        }"#;

        let verdict: ModerationVerdict = serde_json::from_str(json).unwrap();
        assert!(!verdict.approved);
        assert!(verdict.message.contains("basket"));
        assert_eq!(verdict.detected_objects.len(), 2);
    }

    #[test]
    fn test_verdict_tolerates_missing_detections() {
        let json = r#"{"approved": true, "message": "Image approved: contains basket"}"#;
        let verdict: ModerationVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.approved);
        assert!(verdict.detected_objects.is_empty());
    }
}
