use imgconv_image::{Sample, TypedImage};

use crate::error::EngineError;
use crate::interpolation::InterpolationMode;
use crate::parallel::{self, ExecutionStrategy};

/// Sampling positions of a destination axis in source coordinates.
///
/// The grid is corner aligned: the first and last destination samples map to
/// the first and last source samples.
fn linspace(src_len: usize, dst_len: usize) -> Vec<f64> {
    let step = if dst_len > 1 {
        (src_len.saturating_sub(1)) as f64 / (dst_len - 1) as f64
    } else {
        0.0
    };
    (0..dst_len).map(|i| i as f64 * step).collect()
}

/// Kernel for bilinear interpolation of every channel at `(u, v)`.
#[inline]
fn bilinear<T: Sample>(
    data: &[T],
    cols: usize,
    rows: usize,
    channels: usize,
    u: f64,
    v: f64,
    out: &mut [T],
) {
    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);
    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let frac_u = u.fract();
    let frac_v = v.fract();

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = frac_u * (1.0 - frac_v);
    let w10 = (1.0 - frac_u) * frac_v;
    let w11 = frac_u * frac_v;

    let base00 = (iv0 * cols + iu0) * channels;
    let base01 = (iv0 * cols + iu1) * channels;
    let base10 = (iv1 * cols + iu0) * channels;
    let base11 = (iv1 * cols + iu1) * channels;

    for (k, o) in out.iter_mut().enumerate() {
        let value = data[base00 + k].to_f64() * w00
            + data[base01 + k].to_f64() * w01
            + data[base10 + k].to_f64() * w10
            + data[base11 + k].to_f64() * w11;
        *o = T::from_f64(value);
    }
}

/// Kernel for nearest neighbor interpolation of every channel at `(u, v)`.
#[inline]
fn nearest<T: Sample>(
    data: &[T],
    cols: usize,
    rows: usize,
    channels: usize,
    u: f64,
    v: f64,
    out: &mut [T],
) {
    let iu = (u.round() as usize).min(cols - 1);
    let iv = (v.round() as usize).min(rows - 1);
    let base = (iv * cols + iu) * channels;
    out.copy_from_slice(&data[base..base + channels]);
}

/// Resize `src` into `dst` at the destination size.
///
/// Precondition: layouts and depths match, `src` has pixels and `dst` is not
/// empty.
pub(crate) fn resize<T: Sample>(
    src: &TypedImage,
    dst: &mut TypedImage,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
) -> Result<(), EngineError> {
    let (cols, rows, channels) = (src.cols(), src.rows(), src.num_channels());
    let xs = linspace(cols, dst.cols());
    let ys = linspace(rows, dst.rows());
    let row_len = dst.cols() * channels;

    let data = src.as_slice::<T>()?;
    let kernel = match interpolation {
        InterpolationMode::Bilinear => bilinear::<T>,
        InterpolationMode::Nearest => nearest::<T>,
    };

    parallel::par_rows_mut(dst.as_slice_mut::<T>()?, row_len, strategy, |y, row| {
        let v = ys[y];
        for (out, &u) in row.chunks_exact_mut(channels).zip(&xs) {
            kernel(data, cols, rows, channels, u, v, out);
        }
    });

    Ok(())
}
