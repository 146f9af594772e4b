use crate::error::ImageError;
use crate::layout::{ColorLayout, SampleDepth};
use crate::sample::Sample;
use crate::storage::ImageStorage;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imgconv_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels.
    ///
    /// Saturates at `usize::MAX`; images can never be that large.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

/// Number of samples and bytes of an image, or an error if either overflows.
fn buffer_shape(
    size: ImageSize,
    layout: ColorLayout,
    depth: SampleDepth,
) -> Result<(usize, usize), ImageError> {
    let overflow = || {
        ImageError::SizeOverflow(
            size.width,
            size.height,
            layout.channels(),
            depth.size_in_bytes(),
        )
    };
    let samples = size
        .width
        .checked_mul(size.height)
        .and_then(|area| area.checked_mul(layout.channels()))
        .ok_or_else(overflow)?;
    let bytes = samples
        .checked_mul(depth.size_in_bytes())
        .ok_or_else(overflow)?;
    Ok((samples, bytes))
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A handle to a rectangular pixel buffer tagged with a color layout and a
/// sample depth.
///
/// Samples are stored interleaved, row major, as (H, W, C) where C is the
/// channel count of the layout. The tags always agree with the buffer: the
/// buffer holds `width * height * channels` samples of the depth's storage
/// type, and typed access checks the requested type against the depth.
///
/// The handle owns its buffer unless it was built with
/// [`TypedImage::from_raw_parts`]. Owned buffers are released when the handle
/// is dropped.
#[derive(Debug)]
pub struct TypedImage {
    size: ImageSize,
    layout: ColorLayout,
    depth: SampleDepth,
    storage: ImageStorage,
}

impl TypedImage {
    /// Create an empty image with no pixels.
    pub fn empty(layout: ColorLayout, depth: SampleDepth) -> Self {
        Self {
            size: ImageSize::default(),
            layout,
            depth,
            storage: ImageStorage::empty(),
        }
    }

    /// Create a new zero-filled image.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `layout` - The color layout of the pixels.
    /// * `depth` - The storage depth of each sample.
    ///
    /// # Errors
    ///
    /// If the byte length overflows `usize` or the buffer cannot be allocated,
    /// an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};
    ///
    /// let image = TypedImage::new(
    ///     ImageSize { width: 10, height: 20 },
    ///     ColorLayout::Bgr,
    ///     SampleDepth::U16,
    /// ).unwrap();
    ///
    /// assert_eq!(image.num_channels(), 3);
    /// assert_eq!(image.as_bytes().len(), 10 * 20 * 3 * 2);
    /// ```
    pub fn new(
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<Self, ImageError> {
        let (_, len) = buffer_shape(size, layout, depth)?;
        Ok(Self {
            size,
            layout,
            depth,
            storage: ImageStorage::zeroed(len)?,
        })
    }

    /// Create a new image from sample data.
    ///
    /// The depth of the image is the depth of `T`.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the image size, or the image
    /// size overflows, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};
    ///
    /// let image = TypedImage::from_vec(
    ///     ImageSize { width: 2, height: 1 },
    ///     ColorLayout::Gray,
    ///     vec![1.5f32, -2.0],
    /// ).unwrap();
    ///
    /// assert_eq!(image.depth(), SampleDepth::F32);
    /// assert_eq!(image.get::<f32>([0, 1, 0]), Some(-2.0));
    /// ```
    pub fn from_vec<T: Sample>(
        size: ImageSize,
        layout: ColorLayout,
        data: Vec<T>,
    ) -> Result<Self, ImageError> {
        let (expected, _) = buffer_shape(size, layout, T::DEPTH)?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        let mut image = Self::new(size, layout, T::DEPTH)?;
        image.as_slice_mut::<T>()?.copy_from_slice(&data);

        Ok(image)
    }

    /// Create a new image with every sample set to `val`.
    pub fn from_size_val<T: Sample>(
        size: ImageSize,
        layout: ColorLayout,
        val: T,
    ) -> Result<Self, ImageError> {
        let mut image = Self::new(size, layout, T::DEPTH)?;
        image.as_slice_mut::<T>()?.fill(val);
        Ok(image)
    }

    /// Wrap a pixel buffer owned by someone else.
    ///
    /// The returned handle never releases the buffer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of
    /// `size.width * size.height * layout.channels() * depth.size_in_bytes()`
    /// bytes laid out as described in [`TypedImage`], nothing else may access
    /// the buffer while the handle is alive and the buffer must outlive the
    /// handle. It is the caller's responsibility that the layout and depth tags
    /// match the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `ptr` is null or not aligned for the depth, or if
    /// the byte length of the image overflows `usize`.
    pub unsafe fn from_raw_parts(
        ptr: *mut u8,
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<Self, ImageError> {
        let (_, len) = buffer_shape(size, layout, depth)?;
        let storage = ImageStorage::from_raw_parts(ptr, len, depth.size_in_bytes())?;
        Ok(Self {
            size,
            layout,
            depth,
            storage,
        })
    }

    /// Copy the image into a newly owned buffer.
    pub fn try_clone(&self) -> Result<Self, ImageError> {
        Ok(Self {
            size: self.size,
            layout: self.layout,
            depth: self.depth,
            storage: ImageStorage::from_bytes(self.storage.as_bytes())?,
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the color layout tag.
    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    /// Get the sample depth tag.
    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.layout.channels()
    }

    /// Get the total number of samples.
    pub fn num_samples(&self) -> usize {
        self.size.area() * self.num_channels()
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.area() == 0
    }

    /// Whether the buffer is released when the image is dropped.
    pub fn is_owned(&self) -> bool {
        self.storage.is_owned()
    }

    /// Get the underlying buffer.
    pub fn storage(&self) -> &ImageStorage {
        &self.storage
    }

    /// Get the raw bytes of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Get the raw bytes of the buffer mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.storage.as_bytes_mut()
    }

    fn check_depth<T: Sample>(&self) -> Result<(), ImageError> {
        if T::DEPTH != self.depth {
            return Err(ImageError::DepthMismatch {
                expected: T::DEPTH,
                found: self.depth,
            });
        }
        Ok(())
    }

    /// Get the samples as a slice of `T`.
    ///
    /// # Errors
    ///
    /// If `T` is not the storage type of the image depth, an error is returned.
    pub fn as_slice<T: Sample>(&self) -> Result<&[T], ImageError> {
        self.check_depth::<T>()?;
        // SAFETY: the buffer holds num_samples values of T and is aligned for T
        Ok(unsafe {
            std::slice::from_raw_parts(self.storage.as_ptr() as *const T, self.num_samples())
        })
    }

    /// Get the samples as a mutable slice of `T`.
    ///
    /// # Errors
    ///
    /// If `T` is not the storage type of the image depth, an error is returned.
    pub fn as_slice_mut<T: Sample>(&mut self) -> Result<&mut [T], ImageError> {
        self.check_depth::<T>()?;
        let len = self.num_samples();
        // SAFETY: the buffer holds len values of T, is aligned for T and borrowed mutably
        Ok(unsafe { std::slice::from_raw_parts_mut(self.storage.as_mut_ptr() as *mut T, len) })
    }

    /// Copy the samples into a vector.
    pub fn to_vec<T: Sample>(&self) -> Result<Vec<T>, ImageError> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// Get the sample at `[y, x, channel]`.
    ///
    /// Returns `None` if the index is out of bounds or `T` does not match the
    /// image depth.
    pub fn get<T: Sample>(&self, index: [usize; 3]) -> Option<T> {
        let [y, x, c] = index;
        if y >= self.height() || x >= self.width() || c >= self.num_channels() {
            return None;
        }
        let data = self.as_slice::<T>().ok()?;
        data.get((y * self.width() + x) * self.num_channels() + c)
            .copied()
    }

    /// Copy one channel into a new gray image of the same depth.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<TypedImage, ImageError> {
        let channels = self.num_channels();
        if channel >= channels {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, channels));
        }

        let sample_size = self.depth.size_in_bytes();
        let mut dst = TypedImage::new(self.size, ColorLayout::Gray, self.depth)?;
        self.as_bytes()
            .chunks_exact(channels * sample_size)
            .zip(dst.as_bytes_mut().chunks_exact_mut(sample_size))
            .for_each(|(src_pixel, dst_sample)| {
                let start = channel * sample_size;
                dst_sample.copy_from_slice(&src_pixel[start..start + sample_size]);
            });

        Ok(dst)
    }
}
