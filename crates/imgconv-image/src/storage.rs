use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::ImageError;

/// Alignment of every owned buffer, enough for the widest sample type.
pub const STORAGE_ALIGN: usize = std::mem::align_of::<f64>();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ownership {
    /// Allocated here and released on drop.
    Owned,
    /// Borrowed from an outside owner, never released here.
    Foreign,
    /// Zero bytes, nothing to release.
    Empty,
}

/// A contiguous pixel buffer.
///
/// The buffer either owns its memory, in which case it is released when the
/// storage is dropped, or wraps memory owned by someone else.
pub struct ImageStorage {
    /// The pointer to the buffer memory which must be non-null.
    ptr: NonNull<u8>,
    /// The length of the buffer in bytes.
    len: usize,
    /// Who releases the memory.
    ownership: Ownership,
}

// SAFETY: the storage is the only handle to its memory (owned) or the caller
// of `from_raw_parts` guaranteed exclusive access for its lifetime (foreign).
unsafe impl Send for ImageStorage {}
unsafe impl Sync for ImageStorage {}

impl std::fmt::Debug for ImageStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("ownership", &self.ownership)
            .finish()
    }
}

impl ImageStorage {
    /// Creates an empty buffer without allocating.
    pub fn empty() -> Self {
        Self {
            ptr: NonNull::<f64>::dangling().cast::<u8>(),
            len: 0,
            ownership: Ownership::Empty,
        }
    }

    /// Allocates a zero-filled buffer of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the allocation fails.
    pub fn zeroed(len: usize) -> Result<Self, ImageError> {
        if len == 0 {
            return Ok(Self::empty());
        }

        let layout = Layout::from_size_align(len, STORAGE_ALIGN)?;

        // SAFETY: the layout has a non-zero size
        let raw_ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw_ptr).ok_or(ImageError::AllocationFailed(len))?;

        Ok(Self {
            ptr,
            len,
            ownership: Ownership::Owned,
        })
    }

    /// Allocates a buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let mut storage = Self::zeroed(bytes.len())?;
        storage.as_bytes_mut().copy_from_slice(bytes);
        Ok(storage)
    }

    /// Wraps a buffer owned by someone else.
    ///
    /// The memory is never released by the storage.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - `ptr` is valid for reads and writes of `len` bytes
    /// - nothing else accesses the memory while the storage is alive
    /// - the memory outlives the storage
    ///
    /// # Errors
    ///
    /// Returns an error if `ptr` is null, `align` is not a power of two or
    /// `ptr` is not aligned to `align` bytes.
    pub unsafe fn from_raw_parts(
        ptr: *mut u8,
        len: usize,
        align: usize,
    ) -> Result<Self, ImageError> {
        let ptr = NonNull::new(ptr).ok_or(ImageError::NullPointer)?;

        if !align.is_power_of_two() {
            return Err(ImageError::InvalidAlignment(align));
        }

        if (ptr.as_ptr() as usize) % align != 0 {
            return Err(ImageError::MisalignedPointer(ptr.as_ptr() as usize, align));
        }

        Ok(Self {
            ptr,
            len,
            ownership: Ownership::Foreign,
        })
    }

    /// Returns the pointer to the buffer memory.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns the mutable pointer to the buffer memory.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns the buffer as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes, dangling pointers only with len 0
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the buffer as a mutable byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for len bytes and the storage has exclusive access
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer has a length of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the memory is released when the storage is dropped.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.ownership == Ownership::Owned
    }
}

impl Drop for ImageStorage {
    fn drop(&mut self) {
        if self.ownership != Ownership::Owned {
            return;
        }
        // SAFETY: the memory was allocated in `zeroed` with this exact layout
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.len, STORAGE_ALIGN);
            alloc::dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageStorage, STORAGE_ALIGN};
    use crate::error::ImageError;

    #[test]
    fn zeroed_storage() -> Result<(), ImageError> {
        let storage = ImageStorage::zeroed(16)?;
        assert_eq!(storage.len(), 16);
        assert!(storage.is_owned());
        assert!(storage.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(storage.as_ptr() as usize % STORAGE_ALIGN, 0);
        Ok(())
    }

    #[test]
    fn empty_storage() -> Result<(), ImageError> {
        let storage = ImageStorage::zeroed(0)?;
        assert!(storage.is_empty());
        assert!(!storage.is_owned());
        assert!(storage.as_bytes().is_empty());
        Ok(())
    }

    #[test]
    fn foreign_storage_is_not_released() -> Result<(), ImageError> {
        let mut data = vec![1u8, 2, 3, 4];
        {
            let mut storage = unsafe { ImageStorage::from_raw_parts(data.as_mut_ptr(), 4, 1)? };
            assert!(!storage.is_owned());
            storage.as_bytes_mut()[0] = 9;
        }
        // the vector still owns valid memory after the storage dropped
        assert_eq!(data, vec![9, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn foreign_storage_rejects_bad_pointers() {
        let res = unsafe { ImageStorage::from_raw_parts(std::ptr::null_mut(), 4, 1) };
        assert_eq!(res.err(), Some(ImageError::NullPointer));

        let mut data = vec![0u64; 2];
        let odd = unsafe { (data.as_mut_ptr() as *mut u8).add(1) };
        let res = unsafe { ImageStorage::from_raw_parts(odd, 4, 4) };
        assert!(matches!(res, Err(ImageError::MisalignedPointer(_, 4))));
    }

    #[test]
    fn foreign_storage_rejects_bad_alignment() {
        let mut data = vec![0u8; 4];
        for align in [0, 3, 6] {
            let res = unsafe { ImageStorage::from_raw_parts(data.as_mut_ptr(), 4, align) };
            assert_eq!(res.err(), Some(ImageError::InvalidAlignment(align)));
        }
    }
}
