use std::fmt;
use std::str::FromStr;

use crate::error::ImageError;

/// The channel arrangement of a pixel.
///
/// Only the channel count and the identity of the layout matter to the image
/// handle; how to convert between two layouts is decided by the engine.
///
/// # Examples
///
/// ```
/// use imgconv_image::ColorLayout;
///
/// assert_eq!(ColorLayout::Bgra.channels(), 4);
/// assert_eq!("hsv".parse::<ColorLayout>().unwrap(), ColorLayout::Hsv);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorLayout {
    /// Single intensity channel.
    Gray,
    /// Blue, green, red.
    Bgr,
    /// Blue, green, red, alpha.
    Bgra,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Hue, saturation, value.
    Hsv,
    /// Hue, lightness, saturation.
    Hls,
    /// CIE L*a*b*.
    Lab,
    /// CIE L*u*v*.
    Luv,
    /// CIE XYZ.
    Xyz,
    /// Luma with red and blue chroma differences (YCrCb).
    Ycc,
}

impl ColorLayout {
    /// Every layout, in declaration order.
    pub const ALL: [ColorLayout; 11] = [
        ColorLayout::Gray,
        ColorLayout::Bgr,
        ColorLayout::Bgra,
        ColorLayout::Rgb,
        ColorLayout::Rgba,
        ColorLayout::Hsv,
        ColorLayout::Hls,
        ColorLayout::Lab,
        ColorLayout::Luv,
        ColorLayout::Xyz,
        ColorLayout::Ycc,
    ];

    /// Number of channels of a pixel in this layout.
    pub fn channels(&self) -> usize {
        match self {
            ColorLayout::Gray => 1,
            ColorLayout::Bgra | ColorLayout::Rgba => 4,
            _ => 3,
        }
    }

    /// Lowercase name of the layout.
    pub fn name(&self) -> &'static str {
        match self {
            ColorLayout::Gray => "gray",
            ColorLayout::Bgr => "bgr",
            ColorLayout::Bgra => "bgra",
            ColorLayout::Rgb => "rgb",
            ColorLayout::Rgba => "rgba",
            ColorLayout::Hsv => "hsv",
            ColorLayout::Hls => "hls",
            ColorLayout::Lab => "lab",
            ColorLayout::Luv => "luv",
            ColorLayout::Xyz => "xyz",
            ColorLayout::Ycc => "ycc",
        }
    }

    /// Whether the last channel is an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, ColorLayout::Bgra | ColorLayout::Rgba)
    }
}

impl fmt::Display for ColorLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorLayout {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ColorLayout::ALL
            .iter()
            .find(|layout| layout.name() == lower)
            .copied()
            .ok_or_else(|| ImageError::ParseLayout(s.to_string()))
    }
}

/// The per-channel storage representation of a sample.
///
/// # Examples
///
/// ```
/// use imgconv_image::SampleDepth;
///
/// assert!(SampleDepth::U8.is_u8());
/// assert_eq!(SampleDepth::F64.size_in_bytes(), 8);
/// assert_eq!(SampleDepth::I16.range(), (-32768.0, 32767.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SampleDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 8-bit signed integer.
    I8,
    /// 16-bit unsigned integer.
    U16,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl SampleDepth {
    /// Every depth, in declaration order.
    pub const ALL: [SampleDepth; 7] = [
        SampleDepth::U8,
        SampleDepth::I8,
        SampleDepth::U16,
        SampleDepth::I16,
        SampleDepth::I32,
        SampleDepth::F32,
        SampleDepth::F64,
    ];

    /// Size of one sample in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SampleDepth::U8 | SampleDepth::I8 => 1,
            SampleDepth::U16 | SampleDepth::I16 => 2,
            SampleDepth::I32 | SampleDepth::F32 => 4,
            SampleDepth::F64 => 8,
        }
    }

    /// Whether this is the narrowest form, 8-bit unsigned.
    pub fn is_u8(&self) -> bool {
        *self == SampleDepth::U8
    }

    /// Whether samples are floating point.
    pub fn is_float(&self) -> bool {
        matches!(self, SampleDepth::F32 | SampleDepth::F64)
    }

    /// Inclusive range of representable values.
    ///
    /// Floating point depths report the range of finite values.
    pub fn range(&self) -> (f64, f64) {
        match self {
            SampleDepth::U8 => (u8::MIN as f64, u8::MAX as f64),
            SampleDepth::I8 => (i8::MIN as f64, i8::MAX as f64),
            SampleDepth::U16 => (u16::MIN as f64, u16::MAX as f64),
            SampleDepth::I16 => (i16::MIN as f64, i16::MAX as f64),
            SampleDepth::I32 => (i32::MIN as f64, i32::MAX as f64),
            SampleDepth::F32 => (f32::MIN as f64, f32::MAX as f64),
            SampleDepth::F64 => (f64::MIN, f64::MAX),
        }
    }

    /// Lowercase name of the depth.
    pub fn name(&self) -> &'static str {
        match self {
            SampleDepth::U8 => "u8",
            SampleDepth::I8 => "i8",
            SampleDepth::U16 => "u16",
            SampleDepth::I16 => "i16",
            SampleDepth::I32 => "i32",
            SampleDepth::F32 => "f32",
            SampleDepth::F64 => "f64",
        }
    }
}

impl fmt::Display for SampleDepth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SampleDepth {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SampleDepth::ALL
            .iter()
            .find(|depth| depth.name() == lower)
            .copied()
            .ok_or_else(|| ImageError::ParseDepth(s.to_string()))
    }
}
