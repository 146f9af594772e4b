use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

use crate::code::{conversion_code, ColorConversionCode};
use crate::error::EngineError;
use crate::interpolation::InterpolationMode;

/// Per-channel extrema of an image.
#[derive(Clone, Debug, PartialEq)]
pub struct MinMax {
    /// Minimum value of each channel.
    pub min: Vec<f64>,
    /// Maximum value of each channel.
    pub max: Vec<f64>,
    /// `[x, y]` location of the first minimum of each channel.
    pub min_loc: Vec<[usize; 2]>,
    /// `[x, y]` location of the first maximum of each channel.
    pub max_loc: Vec<[usize; 2]>,
}

impl MinMax {
    /// Minimum across all channels.
    pub fn overall_min(&self) -> f64 {
        self.min.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum across all channels.
    pub fn overall_max(&self) -> f64 {
        self.max.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// The primitives a computer vision engine provides for typed images.
///
/// An engine owns the pixel computation: callers hand it source and
/// destination handles with matching preconditions and it fills the
/// destination. Engines that queue work asynchronously must make
/// [`Engine::finish`] block until every queued operation is complete.
pub trait Engine {
    /// Name of the engine, used in logs.
    fn name(&self) -> &str;

    /// Allocate an image the engine can operate on.
    fn alloc(
        &self,
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<TypedImage, EngineError> {
        Ok(TypedImage::new(size, layout, depth)?)
    }

    /// Hand back an image obtained from [`Engine::alloc`].
    fn release(&self, image: TypedImage) {
        drop(image);
    }

    /// Block until every queued operation has completed.
    fn finish(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Write a resized copy of `src` into `dst`.
    ///
    /// Layout and depth must match; the destination size is the target size.
    fn resize(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        interpolation: InterpolationMode,
    ) -> Result<(), EngineError>;

    /// Copy the raw buffer. Size, layout and depth must match.
    fn copy(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), EngineError>;

    /// Compute `dst = src * scale + shift` elementwise.
    ///
    /// Size and channel count must match; the destination depth controls the
    /// output sample width and saturation.
    fn linear_transform(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        scale: f64,
        shift: f64,
    ) -> Result<(), EngineError>;

    /// Convert the color layout of `src` into `dst` with a direct conversion.
    ///
    /// Fails if the code does not match the layouts or no kernel exists for
    /// the depth.
    fn color_convert(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        code: ColorConversionCode,
    ) -> Result<(), EngineError>;

    /// Per-channel minimum and maximum with their locations.
    fn min_max(&self, src: &TypedImage) -> Result<MinMax, EngineError>;

    /// Look up the direct conversion between two layouts.
    fn lookup_conversion_code(
        &self,
        src: ColorLayout,
        dst: ColorLayout,
    ) -> Option<ColorConversionCode> {
        conversion_code(src, dst)
    }

    /// Copy each channel of `src` into the matching gray image of `dsts`.
    fn split(&self, src: &TypedImage, dsts: &mut [TypedImage]) -> Result<(), EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn alloc(
        &self,
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<TypedImage, EngineError> {
        (**self).alloc(size, layout, depth)
    }

    fn release(&self, image: TypedImage) {
        (**self).release(image)
    }

    fn finish(&self) -> Result<(), EngineError> {
        (**self).finish()
    }

    fn resize(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        interpolation: InterpolationMode,
    ) -> Result<(), EngineError> {
        (**self).resize(src, dst, interpolation)
    }

    fn copy(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), EngineError> {
        (**self).copy(src, dst)
    }

    fn linear_transform(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        scale: f64,
        shift: f64,
    ) -> Result<(), EngineError> {
        (**self).linear_transform(src, dst, scale, shift)
    }

    fn color_convert(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        code: ColorConversionCode,
    ) -> Result<(), EngineError> {
        (**self).color_convert(src, dst, code)
    }

    fn min_max(&self, src: &TypedImage) -> Result<MinMax, EngineError> {
        (**self).min_max(src)
    }

    fn lookup_conversion_code(
        &self,
        src: ColorLayout,
        dst: ColorLayout,
    ) -> Option<ColorConversionCode> {
        (**self).lookup_conversion_code(src, dst)
    }

    fn split(&self, src: &TypedImage, dsts: &mut [TypedImage]) -> Result<(), EngineError> {
        (**self).split(src, dsts)
    }
}
