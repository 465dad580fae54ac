//! The currently selected input image.

use super::preview::{decode_color_image, max_texture_side, PreviewHandle};
use crate::error::AcquisitionError;
use eframe::egui;
use std::sync::Arc;

/// Content type used when nothing better is known about a file.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// A file offered by the file picker or a drop, not yet validated.
#[derive(Clone)]
pub struct ImageCandidate {
    pub name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for ImageCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCandidate")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageCandidate {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Build a candidate whose content type is inferred from its file name.
    ///
    /// Native file dialogs and native drops carry no MIME type, so the
    /// extension is the only declaration available there.
    pub fn from_named_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let content_type = infer_content_type(&name);
        Self::new(name, content_type, bytes)
    }

    /// Whether the declared content type is an `image/*` type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// Map a file name to a MIME type using the image format table.
pub fn infer_content_type(name: &str) -> String {
    image::ImageFormat::from_path(name)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_CONTENT_TYPE.to_string())
}

/// An accepted input image together with its preview texture.
pub struct SourceImage {
    name: String,
    content_type: String,
    bytes: Arc<[u8]>,
    preview: PreviewHandle,
}

impl SourceImage {
    /// Decode a candidate and upload its preview.
    ///
    /// Only decodability is checked here; content type validation belongs to
    /// the acquisition step. The preview may be downscaled; `bytes` never is.
    pub fn load(ctx: &egui::Context, candidate: ImageCandidate) -> Result<Self, AcquisitionError> {
        let decoded = decode_color_image(&candidate.bytes, max_texture_side(ctx))
            .map_err(|e| AcquisitionError::Undecodable(e.to_string()))?;
        let preview = PreviewHandle::upload(ctx, "source_preview", decoded);

        Ok(Self {
            name: candidate.name,
            content_type: candidate.content_type,
            bytes: candidate.bytes,
            preview,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw encoded bytes, shared with any in-flight request.
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Sole owner of the current [`SourceImage`].
#[derive(Default)]
pub struct ImageSource {
    current: Option<SourceImage>,
}

impl ImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SourceImage> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Install a new image. The previous one, and its texture, is dropped.
    pub fn replace(&mut self, image: SourceImage) -> &SourceImage {
        if let Some(previous) = self.current.take() {
            log::debug!("Replacing source image {}", previous.name());
        }
        self.current.insert(image)
    }

    /// Drop the current image, releasing its preview.
    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            log::debug!("Clearing source image {}", previous.name());
        }
    }
}
