//! Error types for gel annotation operations
//!
//! Every error is recovered at the boundary of the user action that
//! triggered it; none of them is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid user configuration (labels, ladder selection, ladder tables)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// More lane markers than entries in the custom label list
    #[error("custom label list has {available} entries but lane {index} needs a label")]
    CustomLabelsExhausted {
        /// Zero-based index of the first marker without a label
        index: usize,
        /// Number of custom labels configured
        available: usize,
    },

    /// Ladder name not present in the ladder table
    #[error("unknown ladder '{0}'")]
    UnknownLadder(String),

    /// Unit string not in the fixed unit list
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    /// Configuration file could not be read or parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ladder table could not be parsed
    #[error("invalid ladder table: {0}")]
    InvalidLadderTable(String),

    /// A ladder definition in a loaded table was rejected
    #[error("ladder '{name}': {source}")]
    InvalidLadder {
        /// Name of the rejected ladder
        name: String,
        /// Why it was rejected
        #[source]
        source: SolverError,
    },
}

/// Ladder definitions the log-linear solver cannot handle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The ladder has no fragment sizes at all
    #[error("ladder has no fragment sizes")]
    Empty,

    /// A size is zero, negative or not finite (log10 is undefined)
    #[error("fragment size {0} is not strictly positive")]
    NonPositiveSize(f64),

    /// Fewer than two distinct sizes make the slope undefined
    #[error("ladder needs at least two distinct fragment sizes, found {0}")]
    TooFewDistinctSizes(usize),
}

/// Failure to load an image through the image provider
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be read
    #[error("cannot read {path:?}: {source}")]
    Io {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a supported or intact image
    #[error("cannot decode {path:?}: {source}")]
    Image {
        /// Path that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// The decoded raster has a zero dimension
    #[error("image {path:?} is empty")]
    Empty {
        /// Path of the empty image
        path: PathBuf,
    },
}

/// Failure while writing an exported image
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error while writing the output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoder failure
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// The export region covers no pixels
    #[error("export region is empty")]
    EmptyRegion,

    /// The raster surface could not be allocated
    #[error("cannot allocate a {width}x{height} surface")]
    Surface {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
}

/// Umbrella error for session-level operations
#[derive(Error, Debug)]
pub enum GelError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// An operation that needs a loaded image was requested without one
    #[error("no image loaded")]
    NoImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_labels_message() {
        let err = ConfigurationError::CustomLabelsExhausted {
            index: 3,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "custom label list has 3 entries but lane 3 needs a label"
        );
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: GelError = SolverError::TooFewDistinctSizes(1).into();
        assert!(matches!(err, GelError::Solver(_)));
        assert_eq!(
            err.to_string(),
            "ladder needs at least two distinct fragment sizes, found 1"
        );
    }
}
