#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the image module.
pub mod error;

/// typed image handle and its size.
pub mod image;

/// color layout and sample depth tags.
pub mod layout;

/// sample storage types.
pub mod sample;

/// owned and foreign pixel buffers.
pub mod storage;

pub use crate::error::ImageError;
pub use crate::image::{ImageSize, TypedImage};
pub use crate::layout::{ColorLayout, SampleDepth};
pub use crate::sample::Sample;
pub use crate::storage::ImageStorage;
