mod arith;
mod color;
mod resize;

use imgconv_image::{dispatch_depth, ColorLayout, TypedImage};

use crate::code::ColorConversionCode;
use crate::engine::{Engine, MinMax};
use crate::error::EngineError;
use crate::interpolation::InterpolationMode;
use crate::parallel::ExecutionStrategy;

/// Reference engine computing every primitive on the CPU.
///
/// Work is synchronous, so [`Engine::finish`] returns immediately. Rows are
/// processed on the global Rayon thread pool unless the engine is built with
/// [`ExecutionStrategy::Serial`].
///
/// # Example
///
/// ```
/// use imgconv_engine::{CpuEngine, Engine};
/// use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};
///
/// let engine = CpuEngine::default();
/// let size = ImageSize { width: 2, height: 1 };
/// let src = TypedImage::from_vec(size, ColorLayout::Bgr, vec![0u8, 0, 255, 0, 255, 0]).unwrap();
/// let mut dst = TypedImage::new(size, ColorLayout::Rgb, SampleDepth::U8).unwrap();
///
/// let code = engine.lookup_conversion_code(ColorLayout::Bgr, ColorLayout::Rgb).unwrap();
/// engine.color_convert(&src, &mut dst, code).unwrap();
///
/// assert_eq!(dst.as_slice::<u8>().unwrap(), &[255, 0, 0, 0, 255, 0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEngine {
    strategy: ExecutionStrategy,
}

impl CpuEngine {
    /// Create an engine using the default execution strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given execution strategy.
    pub fn with_strategy(strategy: ExecutionStrategy) -> Self {
        Self { strategy }
    }

    /// The execution strategy of the engine.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }
}

fn check_same_size(src: &TypedImage, dst: &TypedImage) -> Result<(), EngineError> {
    if src.size() != dst.size() {
        return Err(EngineError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

impl Engine for CpuEngine {
    fn name(&self) -> &str {
        "cpu"
    }

    fn resize(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        interpolation: InterpolationMode,
    ) -> Result<(), EngineError> {
        if src.layout() != dst.layout() {
            return Err(EngineError::LayoutMismatch(src.layout(), dst.layout()));
        }
        if src.depth() != dst.depth() {
            return Err(EngineError::DepthMismatch(src.depth(), dst.depth()));
        }
        if dst.is_empty() {
            return Ok(());
        }
        if src.is_empty() {
            return Err(EngineError::InvalidImageSize(
                src.width(),
                src.height(),
                dst.width(),
                dst.height(),
            ));
        }

        log::trace!(
            "resize {} -> {} ({:?}, {})",
            src.size(),
            dst.size(),
            interpolation,
            src.depth()
        );

        dispatch_depth!(src.depth(), T => resize::resize::<T>(src, dst, interpolation, self.strategy))
    }

    fn copy(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), EngineError> {
        check_same_size(src, dst)?;
        if src.layout() != dst.layout() {
            return Err(EngineError::LayoutMismatch(src.layout(), dst.layout()));
        }
        if src.depth() != dst.depth() {
            return Err(EngineError::DepthMismatch(src.depth(), dst.depth()));
        }

        log::trace!("copy {} {} {}", src.size(), src.layout(), src.depth());

        dst.as_bytes_mut().copy_from_slice(src.as_bytes());
        Ok(())
    }

    fn linear_transform(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        scale: f64,
        shift: f64,
    ) -> Result<(), EngineError> {
        check_same_size(src, dst)?;
        if src.num_channels() != dst.num_channels() {
            return Err(EngineError::ChannelMismatch(
                src.num_channels(),
                dst.num_channels(),
            ));
        }

        log::trace!(
            "linear transform {} -> {} scale {scale} shift {shift}",
            src.depth(),
            dst.depth()
        );

        let strategy = self.strategy;
        dispatch_depth!(src.depth(), S => {
            dispatch_depth!(dst.depth(), D => {
                arith::linear_transform::<S, D>(src, dst, scale, shift, strategy)
            })
        })
    }

    fn color_convert(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        code: ColorConversionCode,
    ) -> Result<(), EngineError> {
        if code.src_layout() != src.layout() || code.dst_layout() != dst.layout() {
            return Err(EngineError::UnsupportedCode(code, src.layout(), dst.layout()));
        }
        if src.depth() != dst.depth() {
            return Err(EngineError::DepthMismatch(src.depth(), dst.depth()));
        }
        check_same_size(src, dst)?;
        if !color::supports_depth(code, src.depth()) {
            return Err(EngineError::UnsupportedDepth(code, src.depth()));
        }

        log::trace!("color convert {code:?} {} {}", src.size(), src.depth());

        dispatch_depth!(src.depth(), T => color::convert::<T>(src, dst, code, self.strategy))
    }

    fn min_max(&self, src: &TypedImage) -> Result<MinMax, EngineError> {
        if src.is_empty() {
            return Err(EngineError::EmptyImage);
        }
        dispatch_depth!(src.depth(), T => arith::min_max::<T>(src))
    }

    fn split(&self, src: &TypedImage, dsts: &mut [TypedImage]) -> Result<(), EngineError> {
        if dsts.len() != src.num_channels() {
            return Err(EngineError::ChannelMismatch(src.num_channels(), dsts.len()));
        }
        for dst in dsts.iter() {
            if dst.layout() != ColorLayout::Gray {
                return Err(EngineError::LayoutMismatch(ColorLayout::Gray, dst.layout()));
            }
            if dst.depth() != src.depth() {
                return Err(EngineError::DepthMismatch(src.depth(), dst.depth()));
            }
            check_same_size(src, dst)?;
        }

        dispatch_depth!(src.depth(), T => arith::split::<T>(src, dsts, self.strategy))
    }
}
