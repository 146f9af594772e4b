//! Color conversion kernels.
//!
//! Every kernel works on one pixel widened to `f64` and follows the OpenCV
//! value conventions:
//!
//! * color channels span `[0, 255]` for `u8`, `[0, 65535]` for `u16` and
//!   `[0, 1]` for floating point samples.
//! * 8-bit HSV and HLS store the hue in degrees divided by two, floating point
//!   hue is in degrees `[0, 360)`.
//! * 8-bit L\*a\*b\* stores `L * 255 / 100`, `a + 128`, `b + 128`; 8-bit
//!   L\*u\*v\* stores `L * 255 / 100`, `(u + 134) * 255 / 354`,
//!   `(v + 140) * 255 / 262`.

use imgconv_image::{Sample, SampleDepth, TypedImage};

use crate::code::ColorConversionCode;
use crate::error::EngineError;
use crate::parallel::{self, ExecutionStrategy};

/// Define the RGB weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Linear sRGB (D65) to CIE XYZ.
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

/// CIE XYZ to linear sRGB (D65).
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.240479, -1.53715, -0.498535],
    [-0.969256, 1.875991, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

/// D65 reference white.
const WHITE_X: f64 = 0.950456;
const WHITE_Z: f64 = 1.088754;
const WHITE_U: f64 = 0.19793943;
const WHITE_V: f64 = 0.46831096;

const LAB_EPS: f64 = 0.008856;
const LAB_KAPPA: f64 = 903.3;

/// Value range of a depth as seen by the kernels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Range {
    /// The value of a fully saturated channel, also used for opaque alpha.
    full: f64,
    /// Chroma offset for YCrCb.
    delta: f64,
    /// Whether HSV/HLS/Lab/Luv use the packed 8-bit encoding.
    packed: bool,
}

impl Range {
    fn of(depth: SampleDepth) -> Self {
        match depth {
            SampleDepth::U8 => Self {
                full: 255.0,
                delta: 128.0,
                packed: true,
            },
            SampleDepth::U16 => Self {
                full: 65535.0,
                delta: 32768.0,
                packed: false,
            },
            _ => Self {
                full: 1.0,
                delta: 0.5,
                packed: false,
            },
        }
    }
}

type Kernel = fn([f64; 4], &Range) -> [f64; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Family {
    Reorder,
    Gray,
    Xyz,
    Ycc,
    Hsv,
    Hls,
    Lab,
    Luv,
}

fn family(code: ColorConversionCode) -> Family {
    use ColorConversionCode::*;
    match code {
        BgrToBgra | RgbToRgba | BgraToBgr | RgbaToRgb | BgrToRgba | RgbToBgra | RgbaToBgr
        | BgraToRgb | BgrToRgb | RgbToBgr | BgraToRgba | RgbaToBgra => Family::Reorder,
        BgrToGray | RgbToGray | BgraToGray | RgbaToGray | GrayToBgr | GrayToRgb | GrayToBgra
        | GrayToRgba => Family::Gray,
        BgrToXyz | RgbToXyz | XyzToBgr | XyzToRgb => Family::Xyz,
        BgrToYcc | RgbToYcc | YccToBgr | YccToRgb => Family::Ycc,
        BgrToHsv | RgbToHsv | HsvToBgr | HsvToRgb => Family::Hsv,
        BgrToHls | RgbToHls | HlsToBgr | HlsToRgb => Family::Hls,
        BgrToLab | RgbToLab | LabToBgr | LabToRgb => Family::Lab,
        BgrToLuv | RgbToLuv | LuvToBgr | LuvToRgb => Family::Luv,
    }
}

/// Whether a kernel exists for the conversion at the given depth.
pub(crate) fn supports_depth(code: ColorConversionCode, depth: SampleDepth) -> bool {
    use SampleDepth::*;
    match family(code) {
        Family::Reorder | Family::Gray => matches!(depth, U8 | U16 | F32 | F64),
        Family::Xyz | Family::Ycc => matches!(depth, U8 | U16 | F32),
        Family::Hsv | Family::Hls | Family::Lab | Family::Luv => matches!(depth, U8 | F32),
    }
}

fn kernel(code: ColorConversionCode) -> Kernel {
    use ColorConversionCode::*;
    match code {
        BgrToBgra | RgbToRgba => |p, r| [p[0], p[1], p[2], r.full],
        BgraToBgr | RgbaToRgb => |p, _| p,
        BgrToRgba | RgbToBgra => |p, r| [p[2], p[1], p[0], r.full],
        RgbaToBgr | BgraToRgb | BgrToRgb | RgbToBgr | BgraToRgba | RgbaToBgra => {
            |p, _| [p[2], p[1], p[0], p[3]]
        }
        BgrToGray | BgraToGray => |p, _| [gray(p[2], p[1], p[0]), 0.0, 0.0, 0.0],
        RgbToGray | RgbaToGray => |p, _| [gray(p[0], p[1], p[2]), 0.0, 0.0, 0.0],
        GrayToBgr | GrayToRgb | GrayToBgra | GrayToRgba => |p, r| [p[0], p[0], p[0], r.full],
        BgrToXyz => |p, _| padded(xyz_from_rgb([p[2], p[1], p[0]])),
        RgbToXyz => |p, _| padded(xyz_from_rgb([p[0], p[1], p[2]])),
        XyzToBgr => |p, _| reversed(rgb_from_xyz([p[0], p[1], p[2]])),
        XyzToRgb => |p, _| padded(rgb_from_xyz([p[0], p[1], p[2]])),
        BgrToYcc => |p, r| padded(ycc_from_rgb([p[2], p[1], p[0]], r)),
        RgbToYcc => |p, r| padded(ycc_from_rgb([p[0], p[1], p[2]], r)),
        YccToBgr => |p, r| reversed(rgb_from_ycc([p[0], p[1], p[2]], r)),
        YccToRgb => |p, r| padded(rgb_from_ycc([p[0], p[1], p[2]], r)),
        BgrToHsv => |p, r| padded(hsv_from_rgb([p[2], p[1], p[0]], r)),
        RgbToHsv => |p, r| padded(hsv_from_rgb([p[0], p[1], p[2]], r)),
        HsvToBgr => |p, r| reversed(rgb_from_hsv([p[0], p[1], p[2]], r)),
        HsvToRgb => |p, r| padded(rgb_from_hsv([p[0], p[1], p[2]], r)),
        BgrToHls => |p, r| padded(hls_from_rgb([p[2], p[1], p[0]], r)),
        RgbToHls => |p, r| padded(hls_from_rgb([p[0], p[1], p[2]], r)),
        HlsToBgr => |p, r| reversed(rgb_from_hls([p[0], p[1], p[2]], r)),
        HlsToRgb => |p, r| padded(rgb_from_hls([p[0], p[1], p[2]], r)),
        BgrToLab => |p, r| padded(lab_from_rgb([p[2], p[1], p[0]], r)),
        RgbToLab => |p, r| padded(lab_from_rgb([p[0], p[1], p[2]], r)),
        LabToBgr => |p, r| reversed(rgb_from_lab([p[0], p[1], p[2]], r)),
        LabToRgb => |p, r| padded(rgb_from_lab([p[0], p[1], p[2]], r)),
        BgrToLuv => |p, r| padded(luv_from_rgb([p[2], p[1], p[0]], r)),
        RgbToLuv => |p, r| padded(luv_from_rgb([p[0], p[1], p[2]], r)),
        LuvToBgr => |p, r| reversed(rgb_from_luv([p[0], p[1], p[2]], r)),
        LuvToRgb => |p, r| padded(rgb_from_luv([p[0], p[1], p[2]], r)),
    }
}

/// Convert the pixels of `src` into `dst` with the kernel of `code`.
///
/// Precondition: the layouts match the code, depths and sizes are equal and
/// [`supports_depth`] holds.
pub(crate) fn convert<T: Sample>(
    src: &TypedImage,
    dst: &mut TypedImage,
    code: ColorConversionCode,
    strategy: ExecutionStrategy,
) -> Result<(), EngineError> {
    let kernel = kernel(code);
    let range = Range::of(T::DEPTH);
    let (c1, c2, cols) = (src.num_channels(), dst.num_channels(), src.cols());

    parallel::par_iter_rows(
        src.as_slice::<T>()?,
        c1,
        dst.as_slice_mut::<T>()?,
        c2,
        cols,
        strategy,
        |src_pixel, dst_pixel| {
            let mut p = [0.0; 4];
            for (v, s) in p.iter_mut().zip(src_pixel) {
                *v = s.to_f64();
            }
            let out = kernel(p, &range);
            for (d, v) in dst_pixel.iter_mut().zip(out) {
                *d = T::from_f64(v);
            }
        },
    );

    Ok(())
}

#[inline]
fn gray(r: f64, g: f64, b: f64) -> f64 {
    RW * r + GW * g + BW * b
}

#[inline]
fn padded(p: [f64; 3]) -> [f64; 4] {
    [p[0], p[1], p[2], 0.0]
}

#[inline]
fn reversed(p: [f64; 3]) -> [f64; 4] {
    [p[2], p[1], p[0], 0.0]
}

#[inline]
fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn xyz_from_rgb(rgb: [f64; 3]) -> [f64; 3] {
    mat_mul(&RGB_TO_XYZ, rgb)
}

fn rgb_from_xyz(xyz: [f64; 3]) -> [f64; 3] {
    mat_mul(&XYZ_TO_RGB, xyz)
}

fn ycc_from_rgb([r, g, b]: [f64; 3], range: &Range) -> [f64; 3] {
    let y = gray(r, g, b);
    let cr = (r - y) * 0.713 + range.delta;
    let cb = (b - y) * 0.564 + range.delta;
    [y, cr, cb]
}

fn rgb_from_ycc([y, cr, cb]: [f64; 3], range: &Range) -> [f64; 3] {
    let cr = cr - range.delta;
    let cb = cb - range.delta;
    [
        y + 1.403 * cr,
        y - 0.714 * cr - 0.344 * cb,
        y + 1.773 * cb,
    ]
}

/// Hue in degrees `[0, 360)` of a normalized color.
fn hue(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Encode a hue in degrees for the depth.
#[inline]
fn pack_hue(h: f64, range: &Range) -> f64 {
    if range.packed {
        h / 2.0
    } else {
        h
    }
}

#[inline]
fn unpack_hue(h: f64, range: &Range) -> f64 {
    if range.packed {
        h * 2.0
    } else {
        h
    }
}

/// Normalized RGB from hue sextant, chroma and the smallest component.
fn rgb_from_hue(h: f64, chroma: f64, m: f64) -> [f64; 3] {
    let h = h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    [r + m, g + m, b + m]
}

fn hsv_from_rgb([r, g, b]: [f64; 3], range: &Range) -> [f64; 3] {
    let (r, g, b) = (r / range.full, g / range.full, b / range.full);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = hue(r, g, b, max, delta);
    let s = if max == 0.0 { 0.0 } else { delta / max };
    let v = max;

    let scale = if range.packed { range.full } else { 1.0 };
    [pack_hue(h, range), s * scale, v * scale]
}

fn rgb_from_hsv([h, s, v]: [f64; 3], range: &Range) -> [f64; 3] {
    let scale = if range.packed { range.full } else { 1.0 };
    let (h, s, v) = (unpack_hue(h, range), s / scale, v / scale);
    let chroma = v * s;
    let rgb = rgb_from_hue(h, chroma, v - chroma);
    rgb.map(|c| c * range.full)
}

fn hls_from_rgb([r, g, b]: [f64; 3], range: &Range) -> [f64; 3] {
    let (r, g, b) = (r / range.full, g / range.full, b / range.full);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = hue(r, g, b, max, delta);
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let scale = if range.packed { range.full } else { 1.0 };
    [pack_hue(h, range), l * scale, s * scale]
}

fn rgb_from_hls([h, l, s]: [f64; 3], range: &Range) -> [f64; 3] {
    let scale = if range.packed { range.full } else { 1.0 };
    let (h, l, s) = (unpack_hue(h, range), l / scale, s / scale);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let rgb = rgb_from_hue(h, chroma, l - chroma / 2.0);
    rgb.map(|c| c * range.full)
}

#[inline]
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// CIE XYZ of a color in the depth's range, through the sRGB transfer curve.
fn xyz_from_srgb([r, g, b]: [f64; 3], range: &Range) -> [f64; 3] {
    let linear = [r, g, b].map(|c| srgb_to_linear(c / range.full));
    xyz_from_rgb(linear)
}

fn srgb_from_xyz(xyz: [f64; 3], range: &Range) -> [f64; 3] {
    rgb_from_xyz(xyz).map(|c| linear_to_srgb(c) * range.full)
}

#[inline]
fn lightness(y: f64) -> f64 {
    if y > LAB_EPS {
        116.0 * y.cbrt() - 16.0
    } else {
        LAB_KAPPA * y
    }
}

#[inline]
fn lightness_inv(l: f64) -> f64 {
    if l > LAB_KAPPA * LAB_EPS {
        ((l + 16.0) / 116.0).powi(3)
    } else {
        l / LAB_KAPPA
    }
}

fn lab_from_rgb(rgb: [f64; 3], range: &Range) -> [f64; 3] {
    let [x, y, z] = xyz_from_srgb(rgb, range);
    let f = |t: f64| {
        if t > LAB_EPS {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };
    let (fx, fy, fz) = (f(x / WHITE_X), f(y), f(z / WHITE_Z));

    let l = lightness(y);
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    if range.packed {
        [l * 255.0 / 100.0, a + 128.0, b + 128.0]
    } else {
        [l, a, b]
    }
}

fn rgb_from_lab([l, a, b]: [f64; 3], range: &Range) -> [f64; 3] {
    let (l, a, b) = if range.packed {
        (l * 100.0 / 255.0, a - 128.0, b - 128.0)
    } else {
        (l, a, b)
    };

    let finv = |t: f64| {
        let t3 = t.powi(3);
        if t3 > LAB_EPS {
            t3
        } else {
            (t - 16.0 / 116.0) / 7.787
        }
    };
    let fy = (l + 16.0) / 116.0;
    let y = lightness_inv(l);
    let x = finv(fy + a / 500.0) * WHITE_X;
    let z = finv(fy - b / 200.0) * WHITE_Z;

    srgb_from_xyz([x, y, z], range)
}

fn luv_from_rgb(rgb: [f64; 3], range: &Range) -> [f64; 3] {
    let [x, y, z] = xyz_from_srgb(rgb, range);
    let l = lightness(y);

    let denom = x + 15.0 * y + 3.0 * z;
    let (u, v) = if denom == 0.0 {
        (0.0, 0.0)
    } else {
        let up = 4.0 * x / denom;
        let vp = 9.0 * y / denom;
        (13.0 * l * (up - WHITE_U), 13.0 * l * (vp - WHITE_V))
    };

    if range.packed {
        [
            l * 255.0 / 100.0,
            (u + 134.0) * 255.0 / 354.0,
            (v + 140.0) * 255.0 / 262.0,
        ]
    } else {
        [l, u, v]
    }
}

fn rgb_from_luv([l, u, v]: [f64; 3], range: &Range) -> [f64; 3] {
    let (l, u, v) = if range.packed {
        (
            l * 100.0 / 255.0,
            u * 354.0 / 255.0 - 134.0,
            v * 262.0 / 255.0 - 140.0,
        )
    } else {
        (l, u, v)
    };

    if l <= 0.0 {
        return [0.0; 3];
    }

    let y = lightness_inv(l);
    let up = u / (13.0 * l) + WHITE_U;
    let vp = v / (13.0 * l) + WHITE_V;
    if vp == 0.0 {
        return [0.0; 3];
    }
    let x = y * 9.0 * up / (4.0 * vp);
    let z = y * (12.0 - 3.0 * up - 20.0 * vp) / (4.0 * vp);

    srgb_from_xyz([x, y, z], range)
}
