use imgconv_engine::{Engine, EngineError, InterpolationMode};
use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::scoped::{Scoped, Source};

/// Compute the linear transform that brings a sample range into `u8`.
///
/// Ranges already inside `[0, 255]` are kept as they are. Wider ranges are
/// stretched so that `min` maps to 0 and `max` maps to 255. A constant range
/// outside `[0, 255]` maps every sample to 0.
///
/// # Arguments
///
/// * `min` - The minimum sample value across all channels.
/// * `max` - The maximum sample value across all channels.
///
/// # Returns
///
/// The `(scale, shift)` pair to apply as `dst = src * scale + shift`.
///
/// # Example
///
/// ```
/// use imgconv_convert::u8_normalization;
///
/// assert_eq!(u8_normalization(0.0, 200.0), (1.0, 0.0));
/// assert_eq!(u8_normalization(-10.0, 245.0), (1.0, 10.0));
/// assert_eq!(u8_normalization(300.0, 300.0), (0.0, 0.0));
/// ```
pub fn u8_normalization(min: f64, max: f64) -> (f64, f64) {
    if max > 255.0 || min < 0.0 {
        if max == min {
            return (0.0, 0.0);
        }
        let scale = 255.0 / (max - min);
        (scale, -min * scale)
    } else {
        (1.0, 0.0)
    }
}

/// Converts typed images into each other on an [`Engine`].
///
/// The converter picks the work from the tags of the source and destination:
///
/// * a different size is resized first, into a temporary of the destination
///   size.
/// * equal tags copy the buffer.
/// * a different depth is converted with a linear transform; narrowing into
///   `u8` normalizes with [`u8_normalization`].
/// * a different layout is converted with the direct conversion code, or
///   through the pivot layout of the [`ConvertOptions`] when there is none.
///
/// Temporaries are engine images that are synchronized and released when
/// they go out of scope. At most two are alive at any time.
///
/// # Example
///
/// ```
/// use imgconv_convert::TypedImageConverter;
/// use imgconv_engine::CpuEngine;
/// use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};
///
/// let engine = CpuEngine::default();
/// let converter = TypedImageConverter::new(&engine);
///
/// let src = TypedImage::from_vec(
///     ImageSize { width: 2, height: 1 },
///     ColorLayout::Gray,
///     vec![-1.0f32, 3.0],
/// ).unwrap();
///
/// let dst = converter.convert_to(&src, ColorLayout::Rgb, SampleDepth::U8).unwrap();
///
/// assert_eq!(dst.as_slice::<u8>().unwrap(), &[0, 0, 0, 255, 255, 255]);
/// ```
pub struct TypedImageConverter<'e, E: Engine + ?Sized> {
    engine: &'e E,
    options: ConvertOptions,
}

impl<'e, E: Engine + ?Sized> TypedImageConverter<'e, E> {
    /// Create a converter with the default options.
    pub fn new(engine: &'e E) -> Self {
        Self::with_options(engine, ConvertOptions::default())
    }

    /// Create a converter with the given options.
    pub fn with_options(engine: &'e E, options: ConvertOptions) -> Self {
        Self { engine, options }
    }

    /// The engine running the conversions.
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    /// The options of the converter.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Fill `dst` with the content of `src`.
    ///
    /// The destination keeps its size, layout and depth; the source is
    /// resized, depth converted and color converted as needed. The contents
    /// of `dst` are undefined after an error.
    ///
    /// # Arguments
    ///
    /// * `src` - The image to convert.
    /// * `dst` - The image to write.
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnsupportedConversion`] if the layouts cannot be
    /// converted at the depth, neither directly nor through the pivot layout.
    /// Any other engine failure, including a failed [`Engine::finish`] before
    /// a temporary is released, is returned as [`ConvertError::Engine`].
    pub fn convert_into(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), ConvertError> {
        log::debug!(
            "convert {} {} {} into {} {} {}",
            src.size(),
            src.layout(),
            src.depth(),
            dst.size(),
            dst.layout(),
            dst.depth()
        );

        if dst.is_empty() {
            return Ok(());
        }

        let source = if src.size() != dst.size() {
            let mut resized = self.temporary(dst.size(), src.layout(), src.depth())?;
            self.engine
                .resize(src, &mut resized, self.options.interpolation)?;
            Source::Temporary(resized)
        } else {
            Source::Borrowed(src)
        };

        let same_layout = source.layout() == dst.layout();
        let same_depth = source.depth() == dst.depth();

        match (same_layout, same_depth) {
            (true, true) => self.engine.copy(&source, dst)?,
            (true, false) => self.convert_depth(&source, dst)?,
            (false, true) => self.convert_color(&source, dst)?,
            (false, false) => {
                let mut converted = self.temporary(dst.size(), source.layout(), dst.depth())?;
                self.convert_depth(&source, &mut converted)?;
                source.finish()?;
                self.convert_color(&converted, dst)?;
                return Ok(converted.finish()?);
            }
        }

        Ok(source.finish()?)
    }

    /// Convert `src` into a new image with the given layout and depth.
    ///
    /// The result has the size of `src`.
    ///
    /// # Errors
    ///
    /// See [`TypedImageConverter::convert_into`].
    pub fn convert_to(
        &self,
        src: &TypedImage,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<TypedImage, ConvertError> {
        let mut dst = self.engine.alloc(src.size(), layout, depth)?;
        self.convert_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Resize `src` into a new image of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot resize the image.
    pub fn resize(
        &self,
        src: &TypedImage,
        size: ImageSize,
        interpolation: InterpolationMode,
    ) -> Result<TypedImage, ConvertError> {
        let mut dst = self.engine.alloc(size, src.layout(), src.depth())?;
        self.engine.resize(src, &mut dst, interpolation)?;
        Ok(dst)
    }

    /// Split `src` into one gray image per channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot allocate or split the images.
    pub fn split(&self, src: &TypedImage) -> Result<Vec<TypedImage>, ConvertError> {
        let mut planes = (0..src.num_channels())
            .map(|_| self.engine.alloc(src.size(), ColorLayout::Gray, src.depth()))
            .collect::<Result<Vec<_>, _>>()?;
        self.engine.split(src, &mut planes)?;
        Ok(planes)
    }

    fn temporary(
        &self,
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<Scoped<'e, E>, EngineError> {
        Scoped::alloc(self.engine, size, layout, depth)
    }

    /// Convert between depths of the same layout.
    fn convert_depth(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), ConvertError> {
        let (scale, shift) = if dst.depth().is_u8() && !src.depth().is_u8() {
            let min_max = self.engine.min_max(src)?;
            u8_normalization(min_max.overall_min(), min_max.overall_max())
        } else {
            (1.0, 0.0)
        };

        log::trace!(
            "depth {} -> {} scale {scale} shift {shift}",
            src.depth(),
            dst.depth()
        );

        Ok(self.engine.linear_transform(src, dst, scale, shift)?)
    }

    /// Convert between layouts of the same depth.
    fn convert_color(&self, src: &TypedImage, dst: &mut TypedImage) -> Result<(), ConvertError> {
        let cause = match self
            .engine
            .lookup_conversion_code(src.layout(), dst.layout())
        {
            Some(code) => match self.engine.color_convert(src, dst, code) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    log::debug!("direct conversion {code:?} failed: {err}");
                    Some(err)
                }
            },
            None => {
                log::debug!(
                    "no direct conversion from {} to {}",
                    src.layout(),
                    dst.layout()
                );
                None
            }
        };

        self.convert_through_pivot(src, dst, cause)
    }

    fn convert_through_pivot(
        &self,
        src: &TypedImage,
        dst: &mut TypedImage,
        cause: Option<EngineError>,
    ) -> Result<(), ConvertError> {
        let pivot = self.options.pivot;
        let (src_layout, dst_layout, depth) = (src.layout(), dst.layout(), src.depth());
        let unsupported = |cause| ConvertError::UnsupportedConversion {
            src: src_layout,
            dst: dst_layout,
            depth,
            cause,
        };

        if src_layout == pivot || dst_layout == pivot {
            return Err(unsupported(cause));
        }

        let codes = (
            self.engine.lookup_conversion_code(src_layout, pivot),
            self.engine.lookup_conversion_code(pivot, dst_layout),
        );
        let (Some(to_pivot), Some(from_pivot)) = codes else {
            log::debug!("no conversion from {src_layout} to {dst_layout} through {pivot}");
            return Err(unsupported(cause));
        };

        let mut bridged = self.temporary(src.size(), pivot, depth)?;

        if let Err(err) = self.engine.color_convert(src, &mut bridged, to_pivot) {
            log::debug!("pivot conversion {to_pivot:?} failed: {err}");
            return Err(unsupported(Some(err)));
        }
        if let Err(err) = self.engine.color_convert(&bridged, dst, from_pivot) {
            log::debug!("pivot conversion {from_pivot:?} failed: {err}");
            return Err(unsupported(Some(err)));
        }

        Ok(bridged.finish()?)
    }
}
