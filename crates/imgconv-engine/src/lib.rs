#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color conversion codes and the layout pair lookup table.
pub mod code;

/// CPU reference engine.
pub mod cpu;

/// the engine trait.
pub mod engine;

/// Error types for the engine module.
pub mod error;

/// interpolation modes for resizing.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::code::{conversion_code, ColorConversionCode};
pub use crate::cpu::CpuEngine;
pub use crate::engine::{Engine, MinMax};
pub use crate::error::EngineError;
pub use crate::interpolation::InterpolationMode;
pub use crate::parallel::ExecutionStrategy;
