#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The typed image converter.
pub mod converter;

/// Error types for the convert module.
pub mod error;

/// Converter configuration.
pub mod options;

mod scoped;

pub use crate::converter::{u8_normalization, TypedImageConverter};
pub use crate::error::ConvertError;
pub use crate::options::ConvertOptions;
