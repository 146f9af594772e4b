use crate::layout::SampleDepth;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the samples are accessed with a type of another depth.
    #[error("Image depth is {found} but the samples were accessed as {expected}")]
    DepthMismatch {
        /// The depth of the requested sample type.
        expected: SampleDepth,
        /// The depth the image is tagged with.
        found: SampleDepth,
    },

    /// Error when a foreign buffer pointer is null.
    #[error("Null pointer")]
    NullPointer,

    /// Error when a foreign buffer pointer is not aligned for its depth.
    #[error("Pointer {0:#x} is not aligned to {1} bytes")]
    MisalignedPointer(usize, usize),

    /// Error when the byte length of an image does not fit in `usize`.
    #[error("Image of {0}x{1} pixels with {2} channels of {3} bytes overflows the address space")]
    SizeOverflow(usize, usize, usize, usize),

    /// Error when a foreign buffer alignment is not a power of two.
    #[error("Alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    /// Error when the buffer allocation fails.
    #[error("Failed to allocate {0} bytes")]
    AllocationFailed(usize),

    /// Error when the buffer layout is invalid.
    #[error("Invalid buffer layout")]
    LayoutError(#[from] std::alloc::LayoutError),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a color layout name cannot be parsed.
    #[error("Unknown color layout: {0}")]
    ParseLayout(String),

    /// Error when a sample depth name cannot be parsed.
    #[error("Unknown sample depth: {0}")]
    ParseDepth(String),
}
