use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks that `bytes` starts with the PNG signature.
///
/// ## Failure
/// * [`PngError::NotAPngStream`] if the first 8 bytes are wrong, or if there
///   aren't even 8 bytes.
#[inline]
pub const fn check_signature(bytes: &[u8]) -> PngResult<()> {
  match bytes {
    [137, 80, 78, 71, 13, 10, 26, 10, ..] => Ok(()),
    _ => Err(PngError::NotAPngStream),
  }
}

/// A four byte chunk type code, such as `IHDR`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
#[allow(missing_docs)]
impl PngChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const cHRM: Self = Self(*b"cHRM");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sPLT: Self = Self(*b"sPLT");
  pub const tIME: Self = Self(*b"tIME");

  /// Critical chunks are needed to display the image. Uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & 32) == 0
  }
  /// Public chunks are registered types. Uppercase second letter.
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    (self.0[1] & 32) == 0
  }
  /// Editors may copy these chunks even if they don't know them. Lowercase
  /// fourth letter.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 32) != 0
  }
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
///
/// The payload borrows from the input. The decoder hands each chunk to its
/// handler and then drops it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawPngChunk<'b> {
  pub(crate) chunk_type: PngChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl<'b> RawPngChunk<'b> {
  /// The chunk's type code.
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> PngChunkType {
    self.chunk_type
  }
  /// The chunk's payload.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  /// The CRC that the stream claims for this chunk.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// The CRC computed over the type code and payload.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc(self.chunk_type.0.iter().copied().chain(self.data.iter().copied()))
  }
  /// Compares the declared and computed CRC.
  #[inline]
  pub fn verify_crc(&self) -> PngResult<()> {
    let actual = self.actual_crc();
    if actual == self.declared_crc {
      Ok(())
    } else {
      Err(PngError::ChunkCrcMismatch {
        chunk_type: self.chunk_type,
        declared: self.declared_crc,
        actual,
      })
    }
  }
}
impl Debug for RawPngChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("chunk_type", &self.chunk_type)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// * Each item is a `Result`: the first framing problem gives an `Err`, and
///   after that the iterator is done.
/// * The iterator ends after giving out an `IEND` chunk.
/// * Running out of input before `IEND` is a
///   [`TruncatedInput`](PngError::TruncatedInput) error, even if the input
///   ended cleanly between two chunks.
#[derive(Debug, Clone)]
pub struct RawPngChunkIter<'b> {
  cursor: ByteCursor<'b>,
  done: bool,
}
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and skipped.
  #[inline]
  pub fn new(bytes: &'b [u8]) -> PngResult<Self> {
    check_signature(bytes)?;
    let mut cursor = ByteCursor::new(bytes);
    cursor.read_exact(PNG_SIGNATURE.len())?;
    Ok(Self { cursor, done: false })
  }

  fn read_chunk(&mut self) -> PngResult<RawPngChunk<'b>> {
    let length = self.cursor.read_u32_be()? as usize;
    let chunk_type = PngChunkType(self.cursor.read_array::<4>()?);
    let data = self.cursor.read_exact(length)?;
    let declared_crc = self.cursor.read_u32_be()?;
    Ok(RawPngChunk { chunk_type, data, declared_crc })
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = PngResult<RawPngChunk<'b>>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let out = self.read_chunk();
    self.done = match &out {
      Ok(chunk) => chunk.chunk_type == PngChunkType::IEND,
      Err(_) => true,
    };
    Some(out)
  }
}
impl core::iter::FusedIterator for RawPngChunkIter<'_> {}
