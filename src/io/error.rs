//! Error types for rasterization runs and the file front end

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all rasterization operations
#[derive(Debug, Error)]
pub enum RasterError {
    /// Source image is zero-sized, undecodable, or otherwise unusable
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of what's wrong with the input
        reason: String,
    },

    /// Parameter validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Compositor was handed an empty layer list
    #[error("No layers provided for recombination")]
    EmptyInput,

    /// Cooperative cancellation was honored
    ///
    /// No partial bitmap is returned alongside this error.
    #[error("Rasterization cancelled after {cells_processed} cells")]
    Cancelled {
        /// Grid cells painted before the token was observed
        cells_processed: usize,
    },

    /// Canvas buffer could not be allocated
    #[error("Failed to allocate a {width}x{height} canvas")]
    AllocationFailure {
        /// Requested canvas width in pixels
        width: u32,
        /// Requested canvas height in pixels
        height: u32,
    },

    /// Background worker terminated without producing a result
    #[error("Rasterization worker failed: {reason}")]
    Worker {
        /// Description of the worker failure
        reason: String,
    },

    /// Failed to load source image from filesystem
    #[error("Failed to load image '{}': {source}", path.display())]
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        #[source]
        source: image::ImageError,
    },

    /// Failed to save rendered image to disk
    #[error("Failed to export image to '{}': {source}", path.display())]
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        #[source]
        source: image::ImageError,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl RasterError {
    /// Whether the error belongs to the invalid-input family
    ///
    /// Parameter validation failures count as invalid input for callers that
    /// only distinguish the engine's four error kinds.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InvalidParameter { .. }
        )
    }

    /// Whether the run stopped because it was cancelled
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Convenience type alias for rasterization results
pub type Result<T> = std::result::Result<T, RasterError>;

/// Create an invalid input error
pub fn invalid_input(reason: &impl ToString) -> RasterError {
    RasterError::InvalidInput {
        reason: reason.to_string(),
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> RasterError {
    RasterError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}
