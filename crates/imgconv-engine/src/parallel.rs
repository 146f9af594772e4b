use rayon::prelude::*;

/// Controls how the CPU kernels are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,
}

/// Apply a function to each pixel pair of two interleaved buffers.
///
/// `cols` is the number of pixels per row, `c1` and `c2` the channel counts of
/// the source and destination buffers.
pub fn par_iter_rows<T1, T2>(
    src: &[T1],
    c1: usize,
    dst: &mut [T2],
    c2: usize,
    cols: usize,
    strategy: ExecutionStrategy,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    if cols == 0 || c1 == 0 || c2 == 0 {
        return;
    }

    let row = |(src_chunk, dst_chunk): (&[T1], &mut [T2])| {
        src_chunk
            .chunks_exact(c1)
            .zip(dst_chunk.chunks_exact_mut(c2))
            .for_each(|(src_pixel, dst_pixel)| f(src_pixel, dst_pixel));
    };

    match strategy {
        ExecutionStrategy::ParallelRows => src
            .par_chunks_exact(c1 * cols)
            .zip(dst.par_chunks_exact_mut(c2 * cols))
            .for_each(row),
        ExecutionStrategy::Serial => src
            .chunks_exact(c1 * cols)
            .zip(dst.chunks_exact_mut(c2 * cols))
            .for_each(row),
    }
}

/// Apply a function to each row of a buffer, passing the row index.
pub fn par_rows_mut<T: Send + Sync>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) {
    if row_len == 0 {
        return;
    }

    match strategy {
        ExecutionStrategy::ParallelRows => dst
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row)),
        ExecutionStrategy::Serial => dst
            .chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_rows_serial_and_parallel() {
        let src = vec![1, 2, 3, 4, 5, 6];
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::ParallelRows] {
            let mut dst = vec![0; 3];
            par_iter_rows(&src, 2, &mut dst, 1, 1, strategy, |s, d| d[0] = s[0] + s[1]);
            assert_eq!(dst, vec![3, 7, 11]);
        }
    }

    #[test]
    fn test_iter_rows_empty() {
        let src: Vec<u8> = vec![];
        let mut dst: Vec<u8> = vec![];
        par_iter_rows(
            &src,
            3,
            &mut dst,
            3,
            0,
            ExecutionStrategy::default(),
            |_, _| {},
        );
        assert!(dst.is_empty());
    }

    #[test]
    fn test_rows_mut_index() {
        let mut dst = vec![0usize; 6];
        par_rows_mut(&mut dst, 2, ExecutionStrategy::ParallelRows, |y, row| {
            row.iter_mut().for_each(|v| *v = y)
        });
        assert_eq!(dst, vec![0, 0, 1, 1, 2, 2]);
    }
}
