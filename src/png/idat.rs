use super::*;
use miniz_oxide::inflate::TINFLStatus;

/// Collects the compressed image data.
///
/// * Image data is stored with Zlib compression applied.
/// * Images can have more than one IDAT chunk. The encoder is allowed to split
///   the single Zlib datastream at any byte, so the payloads are glued back
///   together in the order they appear before anything gets decompressed.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IdatAggregator {
  data: Vec<u8>,
  chunk_count: usize,
}
impl Debug for IdatAggregator {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("IdatAggregator")
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("chunk_count", &self.chunk_count)
      .finish()
  }
}
impl IdatAggregator {
  /// An empty aggregator.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { data: Vec::new(), chunk_count: 0 }
  }

  /// Appends one `IDAT` payload. Empty payloads are allowed.
  #[inline]
  pub fn push(&mut self, payload: &[u8]) -> PngResult<()> {
    self.data.try_reserve(payload.len())?;
    self.data.extend_from_slice(payload);
    self.chunk_count += 1;
    Ok(())
  }

  /// How many `IDAT` chunks have been pushed so far.
  #[inline]
  #[must_use]
  pub const fn chunk_count(&self) -> usize {
    self.chunk_count
  }

  /// The compressed bytes gathered so far.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.data
  }

  /// Hands over the whole compressed stream.
  ///
  /// ## Failure
  /// * [`PngError::MissingImageData`] if no `IDAT` chunk was ever pushed.
  #[inline]
  pub fn finish(self) -> PngResult<Vec<u8>> {
    if self.chunk_count == 0 {
      Err(PngError::MissingImageData)
    } else {
      Ok(self.data)
    }
  }
}

/// Decompresses a complete Zlib stream, producing at most `max_len` bytes.
///
/// The decoder passes the header's
/// [`filtered_len`](ScanlineGeometry::filtered_len) here, so the output buffer
/// never grows past what the image can use no matter what the stream claims.
///
/// If the stream would produce more than `max_len` bytes, the first `max_len`
/// are kept and the rest is never decompressed. This is the same as the extra
/// bytes after the last scanline, which are ignored.
///
/// The result is either all of the (possibly capped) output or an error, never
/// a partial buffer.
#[inline]
pub fn inflate_zlib(compressed: &[u8], max_len: usize) -> PngResult<Vec<u8>> {
  // one byte of headroom tells "exactly max_len" apart from "more than that"
  let limit = max_len.saturating_add(1);
  match miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(compressed, limit) {
    Ok(mut out) => {
      if out.len() > max_len {
        warn!("ignoring decompressed bytes past {max_len}");
        out.truncate(max_len);
      }
      Ok(out)
    }
    Err(e) if e.status == TINFLStatus::HasMoreOutput && e.output.len() > max_len => {
      warn!("ignoring decompressed bytes past {max_len}");
      let mut out = e.output;
      out.truncate(max_len);
      Ok(out)
    }
    Err(e) => Err(PngError::Decompression(e.status)),
  }
}
