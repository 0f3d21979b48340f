use super::*;

/// Options for decoding a PNG.
///
/// Set with the `set_*` builder methods:
///
/// ```
/// use pngcore::{DecodeOptions, GrayAlpha};
/// let options = DecodeOptions::default().set_verify_crc(true).set_gray_alpha(GrayAlpha::Opaque);
/// assert!(options.verify_crc());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  verify_crc: bool,
  max_width: u32,
  max_height: u32,
  gray_alpha: GrayAlpha,
}
impl DecodeOptions {
  /// The default options.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      verify_crc: false,
      max_width: u32::MAX,
      max_height: u32::MAX,
      gray_alpha: GrayAlpha::Preserve,
    }
  }

  /// Check every chunk's CRC, failing the decode on a mismatch.
  ///
  /// Default: `false`, CRCs are not looked at.
  #[must_use]
  pub const fn set_verify_crc(mut self, yes: bool) -> Self {
    self.verify_crc = yes;
    self
  }
  /// If CRCs get checked.
  #[must_use]
  pub const fn verify_crc(&self) -> bool {
    self.verify_crc
  }

  /// Images wider than this fail with [`PngError::DimensionsTooLarge`].
  ///
  /// Default: `u32::MAX`, so any valid width is decoded. Memory use is bounded
  /// by the header either way, since decompression stops at the size the
  /// header calls for.
  #[must_use]
  pub const fn set_max_width(mut self, width: u32) -> Self {
    self.max_width = width;
    self
  }
  /// The width limit.
  #[must_use]
  pub const fn max_width(&self) -> u32 {
    self.max_width
  }

  /// Images taller than this fail with [`PngError::DimensionsTooLarge`].
  ///
  /// Default: `u32::MAX`
  #[must_use]
  pub const fn set_max_height(mut self, height: u32) -> Self {
    self.max_height = height;
    self
  }
  /// The height limit.
  #[must_use]
  pub const fn max_height(&self) -> u32 {
    self.max_height
  }

  /// How greyscale + alpha images get their alpha.
  ///
  /// Default: [`GrayAlpha::Preserve`]
  #[must_use]
  pub const fn set_gray_alpha(mut self, gray_alpha: GrayAlpha) -> Self {
    self.gray_alpha = gray_alpha;
    self
  }
  /// The greyscale + alpha handling.
  #[must_use]
  pub const fn gray_alpha(&self) -> GrayAlpha {
    self.gray_alpha
  }
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// A PNG decoder over bytes that are already in memory.
///
/// ```no_run
/// use pngcore::{png::LogObserver, PngDecoder};
/// let png: &[u8] = unimplemented!("data from somewhere");
/// let mut decoder = PngDecoder::new(png);
/// let pixels = decoder.decode_with(&mut LogObserver)?;
/// for failure in decoder.observer_failures() {
///   println!("{:?}: {}", failure.chunk_type, failure.error);
/// }
/// # Ok::<(), pngcore::PngError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PngDecoder<'b> {
  bytes: &'b [u8],
  options: DecodeOptions,
  header: Option<IHDR>,
  observer_failures: Vec<ObserverFailure>,
}
impl<'b> PngDecoder<'b> {
  /// Makes a decoder with the default options.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self::new_with_options(bytes, DecodeOptions::new())
  }

  /// Makes a decoder with the options given.
  #[inline]
  #[must_use]
  pub const fn new_with_options(bytes: &'b [u8], options: DecodeOptions) -> Self {
    Self { bytes, options, header: None, observer_failures: Vec::new() }
  }

  /// Replaces the options.
  #[inline]
  #[must_use]
  pub fn with_options(mut self, options: DecodeOptions) -> Self {
    self.options = options;
    self
  }

  /// The options in use.
  #[inline]
  #[must_use]
  pub const fn options(&self) -> &DecodeOptions {
    &self.options
  }

  /// The header, once [`decode_headers`](Self::decode_headers) or a full
  /// decode has read it.
  #[inline]
  #[must_use]
  pub const fn header(&self) -> Option<&IHDR> {
    self.header.as_ref()
  }

  /// Chunks the observer failed on during the last decode, in stream order.
  #[inline]
  #[must_use]
  pub fn observer_failures(&self) -> &[ObserverFailure] {
    &self.observer_failures
  }

  /// Reads just the signature and header, without decoding any pixels.
  ///
  /// The header is checked against the size limits, but not against what the
  /// decoder supports, so this works on any valid PNG.
  pub fn decode_headers(&mut self) -> PngResult<IHDR> {
    let mut chunks = RawPngChunkIter::new(self.bytes)?;
    self.read_header(&mut chunks)
  }

  fn read_header(&mut self, chunks: &mut RawPngChunkIter<'b>) -> PngResult<IHDR> {
    let raw = chunks.next().ok_or(PngError::MissingHeader)??;
    trace!("Chunk {:?}, {} bytes", raw.chunk_type(), raw.data().len());
    if self.options.verify_crc {
      raw.verify_crc()?;
    }
    let header = IHDR::try_from(raw)?;

    info!("Width: {}", header.width);
    info!("Height: {}", header.height);
    info!("Bit depth: {}", header.bit_depth);
    info!("Color type: {:?}", header.color_type);
    info!("Interlace method: {}", header.interlace_method);

    if header.width > self.options.max_width || header.height > self.options.max_height {
      return Err(PngError::DimensionsTooLarge);
    }
    self.header = Some(header);
    Ok(header)
  }

  /// Decodes the image, without anyone watching the other chunks.
  #[inline]
  pub fn decode(&mut self) -> PngResult<PixelBuffer> {
    self.decode_with(&mut NoopObserver)
  }

  /// Decodes the image, showing the observer every chunk other than `IHDR`,
  /// `IDAT`, and `IEND`.
  ///
  /// Failures from the observer are kept in
  /// [`observer_failures`](Self::observer_failures) and don't stop the decode.
  /// Every other problem does, and no partial image is returned.
  ///
  /// Decoding again starts over from the beginning of the bytes.
  pub fn decode_with<O>(&mut self, observer: &mut O) -> PngResult<PixelBuffer>
  where
    O: ChunkObserver + ?Sized,
  {
    self.header = None;
    self.observer_failures.clear();

    let mut chunks = RawPngChunkIter::new(self.bytes)?;
    let header = self.read_header(&mut chunks)?;
    header.check_supported()?;
    let geometry = ScanlineGeometry::from_header(&header)?;

    let mut idat = IdatAggregator::new();
    for chunk in chunks {
      let chunk = chunk?;
      trace!("Chunk {:?}, {} bytes", chunk.chunk_type(), chunk.data().len());
      if self.options.verify_crc {
        chunk.verify_crc()?;
      }
      match chunk.chunk_type() {
        PngChunkType::IHDR => return Err(PngError::DuplicateHeader),
        PngChunkType::IDAT => idat.push(chunk.data())?,
        // the iterator stops after this
        PngChunkType::IEND => (),
        chunk_type => {
          if let Err(error) = observer.observe(&chunk, Some(&header)) {
            warn!("Observer failed on {:?}: {}", chunk_type, error);
            self.observer_failures.push(ObserverFailure { chunk_type, error });
          }
        }
      }
    }

    debug!("{} IDAT chunks, {} compressed bytes", idat.chunk_count(), idat.as_bytes().len());
    let compressed = idat.finish()?;
    let expected = geometry.filtered_len().ok_or(PngError::DimensionsTooLarge)?;
    let filtered = inflate_zlib(&compressed, expected)?;
    debug!("Inflated {} bytes, expected {}", filtered.len(), expected);
    let reconstructed = unfilter(&filtered, &geometry)?;
    debug!("Reconstructed {} bytes", reconstructed.len());
    assemble_pixels(&reconstructed, &header, self.options.gray_alpha)
  }
}

/// Decodes a whole PNG with the default options.
///
/// Gives the pixels along with the header they came from.
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<(PixelBuffer, IHDR)> {
  let mut decoder = PngDecoder::new(bytes);
  let pixels = decoder.decode()?;
  let header = decoder.header().copied().ok_or(PngError::MissingHeader)?;
  Ok((pixels, header))
}
