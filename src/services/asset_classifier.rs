// src/services/asset_classifier.rs
use crate::errors::BreedSenseError;
use crate::models::{AssetKind, UploadedAsset};
use image::ImageFormat;
use std::path::Path;

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "webm", "mkv"];

/// Sniffs an upload's kind from its declared content type, falling back to
/// the file extension when the browser sends a generic type.
pub struct AssetClassifier;

impl AssetClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(
        &self,
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<AssetKind, BreedSenseError> {
        if let Some(content_type) = content_type {
            let content_type = content_type.to_ascii_lowercase();
            if content_type.starts_with("image/") {
                return Ok(AssetKind::Image);
            }
            if content_type.starts_with("video/") {
                return Ok(AssetKind::Video);
            }
        }

        if ImageFormat::from_path(filename).is_ok() {
            return Ok(AssetKind::Image);
        }

        let is_video = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|video| video.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);

        if is_video {
            Ok(AssetKind::Video)
        } else {
            Err(BreedSenseError::Upload(format!(
                "{} is neither an image nor a video",
                filename
            )))
        }
    }

    pub fn describe(
        &self,
        filename: String,
        content_type: Option<&str>,
        size_bytes: u64,
    ) -> Result<UploadedAsset, BreedSenseError> {
        let kind = self.classify(&filename, content_type)?;
        Ok(UploadedAsset {
            name: filename,
            size_bytes,
            kind,
        })
    }
}

impl Default for AssetClassifier {
    fn default() -> Self {
        Self::new()
    }
}
