use imgconv_image::ColorLayout;

/// Macro to define the conversion codes together with their layout pairs
macro_rules! define_codes {
    ($($name:ident: $src:ident => $dst:ident),+ $(,)?) => {
        /// A direct color conversion between two layouts.
        ///
        /// Only pairs with a dedicated conversion have a code; any other pair
        /// has to be bridged through an intermediate layout.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum ColorConversionCode {
            $(
                #[doc = concat!(stringify!($src), " to ", stringify!($dst), ".")]
                $name,
            )+
        }

        impl ColorConversionCode {
            /// Every conversion code.
            pub const ALL: &'static [ColorConversionCode] = &[$(ColorConversionCode::$name),+];

            /// The layout this conversion reads.
            pub fn src_layout(&self) -> ColorLayout {
                match self {
                    $(ColorConversionCode::$name => ColorLayout::$src,)+
                }
            }

            /// The layout this conversion writes.
            pub fn dst_layout(&self) -> ColorLayout {
                match self {
                    $(ColorConversionCode::$name => ColorLayout::$dst,)+
                }
            }
        }
    };
}

define_codes! {
    // channel order and alpha
    BgrToBgra: Bgr => Bgra,
    RgbToRgba: Rgb => Rgba,
    BgraToBgr: Bgra => Bgr,
    RgbaToRgb: Rgba => Rgb,
    BgrToRgba: Bgr => Rgba,
    RgbToBgra: Rgb => Bgra,
    RgbaToBgr: Rgba => Bgr,
    BgraToRgb: Bgra => Rgb,
    BgrToRgb: Bgr => Rgb,
    RgbToBgr: Rgb => Bgr,
    BgraToRgba: Bgra => Rgba,
    RgbaToBgra: Rgba => Bgra,
    // gray
    BgrToGray: Bgr => Gray,
    RgbToGray: Rgb => Gray,
    BgraToGray: Bgra => Gray,
    RgbaToGray: Rgba => Gray,
    GrayToBgr: Gray => Bgr,
    GrayToRgb: Gray => Rgb,
    GrayToBgra: Gray => Bgra,
    GrayToRgba: Gray => Rgba,
    // cie xyz
    BgrToXyz: Bgr => Xyz,
    RgbToXyz: Rgb => Xyz,
    XyzToBgr: Xyz => Bgr,
    XyzToRgb: Xyz => Rgb,
    // ycrcb
    BgrToYcc: Bgr => Ycc,
    RgbToYcc: Rgb => Ycc,
    YccToBgr: Ycc => Bgr,
    YccToRgb: Ycc => Rgb,
    // hsv
    BgrToHsv: Bgr => Hsv,
    RgbToHsv: Rgb => Hsv,
    HsvToBgr: Hsv => Bgr,
    HsvToRgb: Hsv => Rgb,
    // hls
    BgrToHls: Bgr => Hls,
    RgbToHls: Rgb => Hls,
    HlsToBgr: Hls => Bgr,
    HlsToRgb: Hls => Rgb,
    // cie lab
    BgrToLab: Bgr => Lab,
    RgbToLab: Rgb => Lab,
    LabToBgr: Lab => Bgr,
    LabToRgb: Lab => Rgb,
    // cie luv
    BgrToLuv: Bgr => Luv,
    RgbToLuv: Rgb => Luv,
    LuvToBgr: Luv => Bgr,
    LuvToRgb: Luv => Rgb,
}

/// Look up the direct conversion between two layouts.
///
/// Returns `None` when the layouts are equal or no direct conversion exists.
///
/// # Examples
///
/// ```
/// use imgconv_engine::{conversion_code, ColorConversionCode};
/// use imgconv_image::ColorLayout;
///
/// assert_eq!(
///     conversion_code(ColorLayout::Bgr, ColorLayout::Gray),
///     Some(ColorConversionCode::BgrToGray)
/// );
/// assert_eq!(conversion_code(ColorLayout::Hsv, ColorLayout::Gray), None);
/// ```
pub fn conversion_code(src: ColorLayout, dst: ColorLayout) -> Option<ColorConversionCode> {
    ColorConversionCode::ALL
        .iter()
        .find(|code| code.src_layout() == src && code.dst_layout() == dst)
        .copied()
}
