//! Error types for the deraining workflow.
//!
//! None of these are fatal. Each one is turned into the inline message shown
//! under the upload panel and the user recovers by choosing another image or
//! submitting again.

use std::time::Duration;

/// Rejection of an image candidate (file picker or drop).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    /// The declared content type is not an `image/*` type.
    #[error("not an image: please choose or drop a valid image file (JPEG/PNG)")]
    NotAnImage { content_type: String },

    /// The candidate claims to be an image but its bytes could not be decoded.
    #[error("could not decode image: {0}")]
    Undecodable(String),

    /// A drop event carried no file at all.
    #[error("please drop a valid image file (JPEG/PNG)")]
    EmptyDrop,
}

/// Rejection of a submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("please select or drop an image")]
    NoInput,
}

/// Failure reported by (or on behalf of) the deraining service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("image is too large ({size} bytes, limit is {limit} bytes)")]
    SizeLimitExceeded { size: usize, limit: usize },

    #[error("deraining timed out after {0:?}")]
    Timeout(Duration),

    #[error("request was cancelled")]
    Cancelled,

    #[error("the deraining service returned an unreadable image")]
    UnreadableOutput,

    #[error("deraining failed: {0}")]
    Internal(String),
}

/// Any error surfaced to the user inline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] AcquisitionError),

    #[error(transparent)]
    NoInput(#[from] SubmitError),

    #[error(transparent)]
    Processing(#[from] ServiceError),
}
