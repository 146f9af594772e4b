use imgconv_image::{Sample, TypedImage};

use crate::engine::MinMax;
use crate::error::EngineError;
use crate::parallel::{self, ExecutionStrategy};

/// Compute `dst = src * scale + shift`, saturating into the destination type.
pub(crate) fn linear_transform<S: Sample, D: Sample>(
    src: &TypedImage,
    dst: &mut TypedImage,
    scale: f64,
    shift: f64,
    strategy: ExecutionStrategy,
) -> Result<(), EngineError> {
    let channels = src.num_channels();
    let cols = src.cols();

    parallel::par_iter_rows(
        src.as_slice::<S>()?,
        channels,
        dst.as_slice_mut::<D>()?,
        channels,
        cols,
        strategy,
        |src_pixel, dst_pixel| {
            for (d, s) in dst_pixel.iter_mut().zip(src_pixel) {
                *d = D::from_f64(s.to_f64() * scale + shift);
            }
        },
    );

    Ok(())
}

/// Find the per-channel extrema and the first location of each.
///
/// Precondition: the image has at least one pixel.
pub(crate) fn min_max<T: Sample>(src: &TypedImage) -> Result<MinMax, EngineError> {
    let channels = src.num_channels();
    let cols = src.cols();
    let data = src.as_slice::<T>()?;

    let first = data.get(..channels).ok_or(EngineError::EmptyImage)?;
    let mut min = first.to_vec();
    let mut max = first.to_vec();
    let mut min_idx = vec![0usize; channels];
    let mut max_idx = vec![0usize; channels];

    for (i, pixel) in data.chunks_exact(channels).enumerate() {
        for (c, &x) in pixel.iter().enumerate() {
            if x < min[c] {
                min[c] = x;
                min_idx[c] = i;
            }
            if x > max[c] {
                max[c] = x;
                max_idx[c] = i;
            }
        }
    }

    let loc = |i: usize| [i % cols, i / cols];
    Ok(MinMax {
        min: min.into_iter().map(Sample::to_f64).collect(),
        max: max.into_iter().map(Sample::to_f64).collect(),
        min_loc: min_idx.into_iter().map(loc).collect(),
        max_loc: max_idx.into_iter().map(loc).collect(),
    })
}

/// Copy each channel of `src` into the gray image at the same index.
///
/// Precondition: `dsts` holds one gray image per channel with the size and
/// depth of `src`.
pub(crate) fn split<T: Sample>(
    src: &TypedImage,
    dsts: &mut [TypedImage],
    strategy: ExecutionStrategy,
) -> Result<(), EngineError> {
    let channels = src.num_channels();
    let cols = src.cols();
    let data = src.as_slice::<T>()?;

    for (c, dst) in dsts.iter_mut().enumerate() {
        parallel::par_iter_rows(
            data,
            channels,
            dst.as_slice_mut::<T>()?,
            1,
            cols,
            strategy,
            |src_pixel, dst_pixel| dst_pixel[0] = src_pixel[c],
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{linear_transform, min_max, split};
    use crate::error::EngineError;
    use crate::parallel::ExecutionStrategy;
    use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

    const SIZE: ImageSize = ImageSize {
        width: 2,
        height: 2,
    };

    #[test]
    fn linear_transform_saturates() -> Result<(), EngineError> {
        let src = TypedImage::from_vec(SIZE, ColorLayout::Gray, vec![-10.0f32, 0.4, 100.0, 300.0])?;
        let mut dst = TypedImage::new(SIZE, ColorLayout::Gray, SampleDepth::U8)?;

        linear_transform::<f32, u8>(&src, &mut dst, 1.0, 0.0, ExecutionStrategy::Serial)?;
        assert_eq!(dst.as_slice::<u8>()?, &[0, 0, 100, 255]);

        linear_transform::<f32, u8>(&src, &mut dst, 0.5, 10.0, ExecutionStrategy::ParallelRows)?;
        assert_eq!(dst.as_slice::<u8>()?, &[5, 10, 60, 160]);

        Ok(())
    }

    #[test]
    fn min_max_per_channel() -> Result<(), EngineError> {
        #[rustfmt::skip]
        let src = TypedImage::from_vec(
            SIZE,
            ColorLayout::Rgb,
            vec![
                5i16, -3, 7,   2, 9, 7,
                5, 4, -8,      1, 0, 100,
            ],
        )?;

        let mm = min_max::<i16>(&src)?;
        assert_eq!(mm.min, vec![1.0, -3.0, -8.0]);
        assert_eq!(mm.max, vec![5.0, 9.0, 100.0]);
        assert_eq!(mm.min_loc, vec![[1, 1], [0, 0], [0, 1]]);
        assert_eq!(mm.max_loc, vec![[0, 0], [1, 0], [1, 1]]);

        Ok(())
    }

    #[test]
    fn min_max_empty() {
        let src = TypedImage::empty(ColorLayout::Gray, SampleDepth::U8);
        assert_eq!(min_max::<u8>(&src), Err(EngineError::EmptyImage));
    }

    #[test]
    fn split_channels() -> Result<(), EngineError> {
        let src = TypedImage::from_vec(SIZE, ColorLayout::Bgr, (0u16..12).collect())?;
        let mut dsts = (0..3)
            .map(|_| TypedImage::new(SIZE, ColorLayout::Gray, SampleDepth::U16))
            .collect::<Result<Vec<_>, _>>()?;

        split::<u16>(&src, &mut dsts, ExecutionStrategy::Serial)?;

        assert_eq!(dsts[0].as_slice::<u16>()?, &[0, 3, 6, 9]);
        assert_eq!(dsts[1].as_slice::<u16>()?, &[1, 4, 7, 10]);
        assert_eq!(dsts[2].as_slice::<u16>()?, &[2, 5, 8, 11]);

        Ok(())
    }
}
