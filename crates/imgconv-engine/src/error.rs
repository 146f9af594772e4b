use imgconv_image::{ColorLayout, ImageError, SampleDepth};

use crate::code::ColorConversionCode;

/// An error type for engine primitives.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EngineError {
    /// Error when the source and destination sizes differ.
    #[error("Invalid image size: source ({0}, {1}) does not match destination ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel counts differ.
    #[error("Channel count mismatch: expected {0}, got {1}")]
    ChannelMismatch(usize, usize),

    /// Error when the color layouts differ.
    #[error("Color layout mismatch: expected {0}, got {1}")]
    LayoutMismatch(ColorLayout, ColorLayout),

    /// Error when the sample depths differ.
    #[error("Sample depth mismatch: expected {0}, got {1}")]
    DepthMismatch(SampleDepth, SampleDepth),

    /// Error when a conversion code does not match the image layouts.
    #[error("Conversion {0:?} cannot convert {1} into {2}")]
    UnsupportedCode(ColorConversionCode, ColorLayout, ColorLayout),

    /// Error when no kernel exists for a conversion at a depth.
    #[error("Conversion {0:?} has no kernel for depth {1}")]
    UnsupportedDepth(ColorConversionCode, SampleDepth),

    /// Error when a reduction is asked of an image without pixels.
    #[error("Image has no pixels")]
    EmptyImage,

    /// Error when queued work could not be completed.
    #[error("Engine failed to finish queued work: {0}")]
    Synchronization(String),

    /// Error from the image handle.
    #[error(transparent)]
    Image(#[from] ImageError),
}
