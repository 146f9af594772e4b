use crate::layout::SampleDepth;

/// Trait for the storage types of a sample depth.
///
/// Send and Sync are required to process samples with rayon.
pub trait Sample: Copy + Default + PartialOrd + Send + Sync + 'static {
    /// The depth tag of this storage type.
    const DEPTH: SampleDepth;

    /// Widen the sample to a f64 value.
    fn to_f64(self) -> f64;

    /// Convert a f64 value to the sample type.
    ///
    /// Integer types round half away from zero and saturate to their range,
    /// NaN maps to zero. Floating point types cast.
    fn from_f64(x: f64) -> Self;
}

macro_rules! impl_sample_int {
    ($type:ty, $depth:expr) => {
        impl Sample for $type {
            const DEPTH: SampleDepth = $depth;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(x: f64) -> Self {
                let min = <$type as num_traits::Bounded>::min_value() as f64;
                let max = <$type as num_traits::Bounded>::max_value() as f64;
                // `as` maps NaN to zero
                x.round().clamp(min, max) as $type
            }
        }
    };
}

macro_rules! impl_sample_float {
    ($type:ty, $depth:expr) => {
        impl Sample for $type {
            const DEPTH: SampleDepth = $depth;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(x: f64) -> Self {
                x as $type
            }
        }
    };
}

impl_sample_int!(u8, SampleDepth::U8);
impl_sample_int!(i8, SampleDepth::I8);
impl_sample_int!(u16, SampleDepth::U16);
impl_sample_int!(i16, SampleDepth::I16);
impl_sample_int!(i32, SampleDepth::I32);
impl_sample_float!(f32, SampleDepth::F32);
impl_sample_float!(f64, SampleDepth::F64);

/// Expand `$body` once per depth with `$t` bound to the matching storage type.
///
/// # Examples
///
/// ```
/// use imgconv_image::{dispatch_depth, SampleDepth};
///
/// let depth = SampleDepth::I16;
/// let bytes = dispatch_depth!(depth, T => std::mem::size_of::<T>());
/// assert_eq!(bytes, 2);
/// ```
#[macro_export]
macro_rules! dispatch_depth {
    ($depth:expr, $t:ident => $body:expr) => {
        match $depth {
            $crate::SampleDepth::U8 => {
                type $t = u8;
                $body
            }
            $crate::SampleDepth::I8 => {
                type $t = i8;
                $body
            }
            $crate::SampleDepth::U16 => {
                type $t = u16;
                $body
            }
            $crate::SampleDepth::I16 => {
                type $t = i16;
                $body
            }
            $crate::SampleDepth::I32 => {
                type $t = i32;
                $body
            }
            $crate::SampleDepth::F32 => {
                type $t = f32;
                $body
            }
            $crate::SampleDepth::F64 => {
                type $t = f64;
                $body
            }
        }
    };
}
