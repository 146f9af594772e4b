use imgconv_engine::EngineError;
use imgconv_image::{ColorLayout, ImageError, SampleDepth};

/// An error type for the converter.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvertError {
    /// Error when neither a direct nor a two-step color conversion exists.
    ///
    /// `cause` holds the engine error of the last attempt, if any attempt
    /// reached the engine.
    #[error("Conversion from {src} to {dst} is not supported for depth {depth}")]
    UnsupportedConversion {
        /// The source color layout.
        src: ColorLayout,
        /// The destination color layout.
        dst: ColorLayout,
        /// The depth the color conversion was attempted at.
        depth: SampleDepth,
        /// The engine error of the last failed attempt.
        #[source]
        cause: Option<EngineError>,
    },

    /// Error from the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Error from an image handle.
    #[error(transparent)]
    Image(#[from] ImageError),
}
