//! Holds all the tools for decoding PNG data.
//!
//! ## Automated PNG Decoding
//! If you don't need control over the decoding process, [`decode_png`] takes
//! the PNG bytes and gives you a [`PixelBuffer`] along with the image's
//! [`IHDR`]. [`PngDecoder`] does the same, but lets you pick
//! [`DecodeOptions`] and watch the ancillary chunks go by with a
//! [`ChunkObserver`].
//!
//! ## Decoding a PNG Yourself
//! Each stage of the decoder is public, so you can also run them one at a
//! time.
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! You iterate the chunks and each one gives you some info that you might
//! decide to use. There's four "critical" chunk types:
//! * **Header** - This has all the important information about the image's
//!   dimensions, pixel format, and if the image is interlaced or not. Using
//!   this information you'll be able to know how much space is required for
//!   decompression, and how much final space is required after unfiltering.
//! * **Palette** - If an image uses indexed color it will have a palette of
//!   what index values map to what `RGB8` values.
//! * **Image Data** - One or more chunks of compressed data. All of the
//!   compressed data forms a single zlib data stream.
//! * **End** - The last chunk, lets you know you had the full PNG and your data
//!   wasn't truncated accidentally.
//!
//! ### Step By Step
//!
//! ```no_run
//! use pngcore::png::*;
//! # fn or_png_error(png: &[u8]) -> Result<(), pngcore::PngError> {
//! let mut it = RawPngChunkIter::new(png)?;
//! let header = IHDR::try_from(it.next().ok_or(pngcore::PngError::MissingHeader)??)?;
//! header.check_supported()?;
//! let geometry = ScanlineGeometry::from_header(&header)?;
//!
//! let mut idat = IdatAggregator::new();
//! for chunk in it {
//!   let chunk = chunk?;
//!   if chunk.chunk_type() == PngChunkType::IDAT {
//!     idat.push(chunk.data())?;
//!   }
//! }
//!
//! let max_len = geometry.filtered_len().ok_or(pngcore::PngError::DimensionsTooLarge)?;
//! let filtered = inflate_zlib(&idat.finish()?, max_len)?;
//! let reconstructed = unfilter(&filtered, &geometry)?;
//! let pixels = assemble_pixels(&reconstructed, &header, GrayAlpha::Preserve)?;
//! # Ok(())
//! # }
//! ```

use core::fmt::{Debug, Write};

use alloc::vec::Vec;
use log::{debug, info, trace, warn};

use crate::{ByteCursor, PixelBuffer, PixelLayout, PngError, PngResult};

mod crc32;
pub use crc32::png_crc;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod idat;
pub use idat::*;

mod unfilter;
pub use unfilter::*;

mod assemble;
pub use assemble::*;

mod chunks;
pub use chunks::*;

mod observer;
pub use observer::*;

mod decoder;
pub use decoder::*;
