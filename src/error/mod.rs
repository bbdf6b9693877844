//! Errors of the evaluator.

/// The error of every fallible operation in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The feature extractor cannot run on the device.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The mask has no foreground pixel to crop.
    #[error("Degenerate mask: no foreground pixel to crop")]
    DegenerateMask,

    /// Encoding or decoding an image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing or deserializing the metrics failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame size differs from the working resolution.
    #[error("Mismatched resolution: expected {expected:?}, found {found:?}")]
    MismatchedResolution {
        /// `[H, W]` of the working resolution.
        expected: [usize; 2],
        /// `[H, W]` of the frame.
        found: [usize; 2],
    },

    /// The sizes of related inputs disagree.
    #[error("Mismatched shape: {0}")]
    MismatchedShape(String),

    /// Loading a burn record failed.
    #[error("Record error: {0}")]
    Record(#[from] burn::record::RecorderError),
}
