use super::*;

/// Why a [`ChunkObserver`] didn't accept a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverError {
  /// The payload doesn't have the layout its chunk type requires.
  Malformed {
    /// the chunk's type
    chunk_type: PngChunkType,
    /// the payload length that was found
    len: usize,
  },
  /// The observer turned the chunk down for its own reasons.
  Rejected(&'static str),
}
impl core::fmt::Display for ObserverError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Malformed { chunk_type, len } => {
        write!(f, "malformed {chunk_type:?} chunk with {len} data bytes")
      }
      Self::Rejected(why) => write!(f, "chunk rejected: {why}"),
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for ObserverError {}

/// A chunk that an observer failed on, kept after the decode finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverFailure {
  /// the chunk's type
  pub chunk_type: PngChunkType,
  /// what the observer said
  pub error: ObserverError,
}

/// Gets a look at every chunk that the decoder itself doesn't use.
///
/// That's everything except `IHDR`, `IDAT`, and `IEND`, in stream order. An
/// error from the observer is recorded and logged, but the decode carries on.
///
/// Any `FnMut(&RawPngChunk, Option<&IHDR>) -> Result<(), ObserverError>`
/// closure is an observer.
pub trait ChunkObserver {
  /// Looks at one chunk. The `header` is the image's parsed `IHDR`.
  fn observe(&mut self, chunk: &RawPngChunk<'_>, header: Option<&IHDR>)
    -> Result<(), ObserverError>;
}
impl<F> ChunkObserver for F
where
  F: FnMut(&RawPngChunk<'_>, Option<&IHDR>) -> Result<(), ObserverError>,
{
  #[inline]
  fn observe(
    &mut self, chunk: &RawPngChunk<'_>, header: Option<&IHDR>,
  ) -> Result<(), ObserverError> {
    self(chunk, header)
  }
}

/// Ignores every chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoopObserver;
impl ChunkObserver for NoopObserver {
  #[inline]
  fn observe(&mut self, _: &RawPngChunk<'_>, _: Option<&IHDR>) -> Result<(), ObserverError> {
    Ok(())
  }
}

/// Parses each chunk with [`AncillaryChunk::parse`] and logs the result at
/// `debug` level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogObserver;
impl ChunkObserver for LogObserver {
  fn observe(
    &mut self, chunk: &RawPngChunk<'_>, header: Option<&IHDR>,
  ) -> Result<(), ObserverError> {
    match AncillaryChunk::parse(chunk, header)? {
      AncillaryChunk::Unknown(chunk_type) => {
        trace!("Encountered unknown chunk {:?}, {} bytes", chunk_type, chunk.data().len());
        if chunk_type.is_critical() {
          debug!("Chunk {:?} is marked critical but isn't understood", chunk_type);
        }
      }
      AncillaryChunk::tEXt(tEXt { keyword, text }) => {
        debug!("tEXt {}: {}", Latin1(keyword), Latin1(text))
      }
      parsed => debug!("{:?}", parsed),
    }
    Ok(())
  }
}

/// Displays Latin-1 bytes as text.
struct Latin1<'a>(&'a [u8]);
impl core::fmt::Display for Latin1<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    self.0.iter().try_for_each(|&b| f.write_char(b as char))
  }
}
