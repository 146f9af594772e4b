#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imgconv_image as image;

#[doc(inline)]
pub use imgconv_engine as engine;

#[doc(inline)]
pub use imgconv_convert as convert;
