/// Error types for the animation core
use thiserror::Error;

/// Precondition violations raised by the core operations.
///
/// Every variant signals a programming error by the caller. Numeric edge
/// cases (zero norms, zero homogeneous divisors) are not errors and travel
/// through as non-finite values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Two buffers that must line up have different shapes
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Axis index outside {0, 1, 2}
    #[error("Axis index {0} is out of range, expected 0, 1 or 2")]
    AxisOutOfRange(usize),

    /// Scale factors must be strictly positive
    #[error("Scale factor must be positive, got {0}")]
    NonPositiveScale(f64),

    /// Only pure quaternions map back to vectors
    #[error("Quaternion has non-zero scalar part {0}, it does not represent a vector")]
    NonZeroScalarPart(f64),

    /// Angle and axis batches that cannot be paired up
    #[error("Cannot pair {angles} angles with {axes} axes")]
    AmbiguousBatch { angles: usize, axes: usize },

    /// Projection selector that names no known method
    #[error("Unknown projection method: {0}")]
    UnknownProjection(String),

    /// Keyframe slot index outside {0, 1}
    #[error("Keyframe slot {0} is out of range, expected 0 or 1")]
    SlotOutOfRange(usize),

    /// A face refers to a vertex that does not exist
    #[error("Face {face} refers to vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// Malformed wireframe text
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration values that the simulation cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by a renderer while drawing a frame
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type using the core [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Render(err.to_string())
    }
}
