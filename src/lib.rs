#![no_std]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! A crate for decoding PNG data into pixels.
//!
//! The decoder works on a PNG that's already entirely in memory. It checks the
//! signature, walks the chunks, gathers up the compressed image data,
//! decompresses it (with [`miniz_oxide`]), reverses the per-scanline
//! filtering, and then copies the pixels out into a [`PixelBuffer`].
//!
//! ```no_run
//! let png: &[u8] = unimplemented!("data from somewhere");
//! let (pixels, header) = pngcore::decode_png(png)?;
//! assert_eq!(pixels.width(), header.width);
//! # Ok::<(), pngcore::PngError>(())
//! ```
//!
//! Only 8 and 16 bit non-interlaced images of the grayscale, grayscale+alpha,
//! RGB, and RGBA color types are decoded. Everything else gives back an error
//! saying what's unsupported, rather than a wrong-looking image.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod cursor;
pub use cursor::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod png;
pub use png::{decode_png, DecodeOptions, GrayAlpha, PngDecoder, IHDR};
