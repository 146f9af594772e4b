use imgconv_engine::InterpolationMode;
use imgconv_image::ColorLayout;

/// Options of a [`crate::TypedImageConverter`].
///
/// # Example
///
/// ```
/// use imgconv_convert::ConvertOptions;
/// use imgconv_engine::InterpolationMode;
/// use imgconv_image::ColorLayout;
///
/// let options = ConvertOptions::default().with_interpolation(InterpolationMode::Nearest);
///
/// assert_eq!(options.interpolation, InterpolationMode::Nearest);
/// assert_eq!(options.pivot, ColorLayout::Bgr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Interpolation used when the source has to be resized.
    pub interpolation: InterpolationMode,
    /// Intermediate layout for color conversions without a direct code.
    pub pivot: ColorLayout,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::Bilinear,
            pivot: ColorLayout::Bgr,
        }
    }
}

impl ConvertOptions {
    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the pivot layout.
    pub fn with_pivot(mut self, pivot: ColorLayout) -> Self {
        self.pivot = pivot;
        self
    }
}
