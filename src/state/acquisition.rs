//! Input acquisition: file picker and drag-and-drop.
//!
//! Both entry points funnel through [`InputAcquisition::accept_candidate`], so
//! there is exactly one validation path for new images.

use super::source::{ImageCandidate, ImageSource, SourceImage};
use crate::error::AcquisitionError;
use eframe::egui;

/// Drag-over indicator and acceptance bookkeeping.
#[derive(Default)]
pub struct InputAcquisition {
    /// True while a file is being dragged over the drop target. Visual only.
    is_dragging: bool,

    /// Whether a file dialog is open.
    picker_open: bool,

    /// Number of images accepted this session.
    accepted_count: u64,
}

impl InputAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Mark the file dialog open. Returns false if one is already open.
    pub fn open_picker(&mut self) -> bool {
        !std::mem::replace(&mut self.picker_open, true)
    }

    pub fn picker_closed(&mut self) {
        self.picker_open = false;
    }

    pub fn drag_hovered(&mut self) {
        if !self.is_dragging {
            log::debug!("Drag entered drop target");
        }
        self.is_dragging = true;
    }

    pub fn drag_left(&mut self) {
        if self.is_dragging {
            log::debug!("Drag left drop target");
        }
        self.is_dragging = false;
    }

    /// Validate a candidate and, if it is an image, make it the current source.
    ///
    /// On any error the current source is left untouched. On success the
    /// previous source (and its preview texture) is released.
    pub fn accept_candidate<'a>(
        &mut self,
        ctx: &egui::Context,
        source: &'a mut ImageSource,
        candidate: ImageCandidate,
    ) -> Result<&'a SourceImage, AcquisitionError> {
        if !candidate.is_image() {
            log::warn!(
                "Rejected {}: content type {:?} is not an image",
                candidate.name,
                candidate.content_type
            );
            return Err(AcquisitionError::NotAnImage {
                content_type: candidate.content_type,
            });
        }

        let image = SourceImage::load(ctx, candidate).inspect_err(|e| {
            log::warn!("Rejected candidate: {}", e);
        })?;

        self.accepted_count += 1;
        log::info!(
            "Accepted image #{} {} ({}, {} bytes, {}x{})",
            self.accepted_count,
            image.name(),
            image.content_type(),
            image.byte_len(),
            image.preview().dimensions()[0],
            image.preview().dimensions()[1],
        );

        Ok(source.replace(image))
    }

    /// Handle a drop: clears the drag indicator and validates the dropped file
    /// the same way as a picked one.
    pub fn accept_drop<'a>(
        &mut self,
        ctx: &egui::Context,
        source: &'a mut ImageSource,
        candidate: Option<ImageCandidate>,
    ) -> Result<&'a SourceImage, AcquisitionError> {
        self.is_dragging = false;
        match candidate {
            Some(candidate) => self.accept_candidate(ctx, source, candidate),
            None => {
                log::warn!("Drop carried no readable file");
                Err(AcquisitionError::EmptyDrop)
            }
        }
    }
}
