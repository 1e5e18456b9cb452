use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the cutout tools.
///
/// Each variant carries the context of its domain (filesystem, image
/// processing, model inference, PDF handling) so callers can report where a
/// run failed without parsing message strings.
#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {operation} failed (file: {path})")]
    ImageProcessing {
        path: String,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Model error: {operation} failed")]
    Model {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("PDF error: {operation} failed for {path:?}")]
    Pdf {
        path: PathBuf,
        operation: String,
        #[source]
        source: lopdf::Error,
    },

    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CutoutError>;

impl CutoutError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path and operation should construct
/// `CutoutError::FileSystem` directly; this is the fallback.
impl From<std::io::Error> for CutoutError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

impl From<image::ImageError> for CutoutError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: "unknown".to_string(),
            operation: "image processing".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<ort::Error> for CutoutError {
    fn from(err: ort::Error) -> Self {
        Self::Model {
            operation: "ort operation".to_string(),
            source: Box::new(err),
        }
    }
}

/// Shape errors only occur while reshaping model tensors, so they are
/// reported as model errors.
impl From<ndarray::ShapeError> for CutoutError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Model {
            operation: "tensor shape conversion".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<lopdf::Error> for CutoutError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf {
            path: PathBuf::from("unknown"),
            operation: "pdf operation".to_string(),
            source: err,
        }
    }
}
