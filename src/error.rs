use core::fmt;

use miniz_oxide::inflate::TINFLStatus;

use crate::png::PngChunkType;

/// Shorthand for results from this crate.
pub type PngResult<T> = Result<T, PngError>;

/// An error from the PNG decoder.
///
/// Every error is terminal for the decode that produced it. The decoder stops
/// at the first error and never hands back a partial image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The first 8 bytes are not the PNG signature.
  NotAPngStream,

  /// A read went past the end of the input.
  TruncatedInput {
    /// Byte offset where the read started.
    offset: usize,
    /// How many bytes the read wanted.
    needed: usize,
    /// How many bytes were actually left.
    remaining: usize,
  },

  /// The first chunk of the stream is not `IHDR`.
  MissingHeader,

  /// A second `IHDR` showed up after the first one.
  DuplicateHeader,

  /// The `IHDR` payload is not exactly 13 bytes.
  InvalidHeaderLength(usize),

  /// The declared width and/or height of this image is 0.
  InvalidDimensions,

  /// The image is larger than the configured limits, or so large that the
  /// buffer sizes can't be computed.
  DimensionsTooLarge,

  /// The color type is not one of 0, 2, 3, 4, or 6.
  InvalidColorType(u8),

  /// The bit depth isn't allowed for the color type.
  InvalidBitDepth {
    /// declared bit depth
    bit_depth: u8,
    /// declared color type
    color_type: u8,
  },

  /// The interlace method is not 0 or 1.
  InvalidInterlaceMethod(u8),

  /// Only compression method 0 (zlib) exists.
  UnsupportedCompressionMethod(u8),

  /// Only filter method 0 (adaptive) exists.
  UnsupportedFilterMethod(u8),

  /// The color type is legal, but this decoder doesn't reconstruct it.
  UnsupportedColorType(u8),

  /// Interlaced images are not decoded.
  UnsupportedInterlace,

  /// Bit depths below 8 are not decoded.
  UnsupportedBitDepth(u8),

  /// Integer reads are only 1 to 4 bytes wide.
  UnsupportedIntWidth(usize),

  /// There were no `IDAT` chunks before `IEND`.
  MissingImageData,

  /// A chunk's declared CRC doesn't match its contents.
  ChunkCrcMismatch {
    /// the chunk that failed
    chunk_type: PngChunkType,
    /// CRC stored in the stream
    declared: u32,
    /// CRC computed from the chunk
    actual: u32,
  },

  /// A scanline used a filter type other than 0 through 4.
  UnknownFilterType {
    /// row of the bad scanline
    row: u32,
    /// the filter byte found
    filter: u8,
  },

  /// The decompressed data ran out before the last scanline.
  TruncatedScanlines {
    /// first row that wasn't complete
    row: u32,
  },

  /// The zlib stream couldn't be decompressed.
  Decompression(TINFLStatus),

  /// The allocator couldn't give us enough space.
  Alloc,
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotAPngStream => write!(f, "bad PNG signature, not a png"),
      Self::TruncatedInput { offset, needed, remaining } => write!(
        f,
        "unexpected end of input at byte {offset}: needed {needed} bytes, {remaining} remain"
      ),
      Self::MissingHeader => write!(f, "first chunk is not IHDR"),
      Self::DuplicateHeader => write!(f, "multiple IHDR chunks, corrupt PNG"),
      Self::InvalidHeaderLength(len) => write!(f, "IHDR length is {len}, expected 13"),
      Self::InvalidDimensions => write!(f, "width or height cannot be zero"),
      Self::DimensionsTooLarge => write!(f, "image dimensions are too large"),
      Self::InvalidColorType(c) => write!(f, "unknown color type {c}"),
      Self::InvalidBitDepth { bit_depth, color_type } => {
        write!(f, "bit depth {bit_depth} is not allowed with color type {color_type}")
      }
      Self::InvalidInterlaceMethod(m) => write!(f, "unknown interlace method {m}"),
      Self::UnsupportedCompressionMethod(m) => write!(f, "unknown compression method {m}"),
      Self::UnsupportedFilterMethod(m) => write!(f, "unknown filter method {m}"),
      Self::UnsupportedColorType(c) => write!(f, "color type {c} is not supported"),
      Self::UnsupportedInterlace => write!(f, "interlaced images are not supported"),
      Self::UnsupportedBitDepth(d) => write!(f, "bit depth {d} is not supported"),
      Self::UnsupportedIntWidth(n) => write!(f, "can't read a {n} byte integer"),
      Self::MissingImageData => write!(f, "no IDAT chunks found"),
      Self::ChunkCrcMismatch { chunk_type, declared, actual } => write!(
        f,
        "CRC mismatch in {chunk_type:?}: declared {declared:#010X}, computed {actual:#010X}"
      ),
      Self::UnknownFilterType { row, filter } => {
        write!(f, "unknown filter type {filter} on row {row}")
      }
      Self::TruncatedScanlines { row } => {
        write!(f, "decompressed data ends before the end of row {row}")
      }
      Self::Decompression(status) => write!(f, "zlib decompression failed: {status:?}"),
      Self::Alloc => write!(f, "allocation failed"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {}

impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TINFLStatus> for PngError {
  #[inline]
  fn from(status: TINFLStatus) -> Self {
    Self::Decompression(status)
  }
}
