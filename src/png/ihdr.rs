use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If the bit depth is legal for this color type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      other => return Err(PngError::InvalidColorType(other)),
    })
  }
}

/// Image Header
///
/// This is always the first chunk. Once parsed it doesn't change, and every
/// later stage of the decode reads from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// always 0 (zlib) in a valid image
  pub compression_method: u8,
  /// always 0 (adaptive) in a valid image
  pub filter_method: u8,
  /// 0 for none, 1 for Adam7.
  ///
  /// please don't make new interlaced images, they're terrible.
  pub interlace_method: u8,
}
impl IHDR {
  /// The number of bytes in an `IHDR` chunk's data.
  pub const LENGTH: usize = 13;

  /// If the image data is stored interlaced.
  #[inline]
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    self.interlace_method != 0
  }

  /// Bits for each full pixel (all channels).
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes for each full pixel, rounded up, and never less than 1.
  ///
  /// This is the distance back to the "left" byte when unfiltering.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    let bytes = (self.bits_per_pixel() + 7) / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Checks that this decoder can reconstruct the image.
  ///
  /// ## Failure
  /// * [`PngError::UnsupportedInterlace`] for interlaced images.
  /// * [`PngError::UnsupportedColorType`] for indexed color.
  /// * [`PngError::UnsupportedBitDepth`] for bit depths below 8.
  #[inline]
  pub const fn check_supported(&self) -> PngResult<()> {
    if self.is_interlaced() {
      Err(PngError::UnsupportedInterlace)
    } else if matches!(self.color_type, PngColorType::Index) {
      Err(PngError::UnsupportedColorType(self.color_type as u8))
    } else if self.bit_depth < 8 {
      Err(PngError::UnsupportedBitDepth(self.bit_depth))
    } else {
      Ok(())
    }
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    if data.len() != Self::LENGTH {
      return Err(PngError::InvalidHeaderLength(data.len()));
    }
    let mut c = ByteCursor::new(data);
    let width = c.read_u32_be()?;
    let height = c.read_u32_be()?;
    let bit_depth = c.read_u8()?;
    let raw_color_type = c.read_u8()?;
    let compression_method = c.read_u8()?;
    let filter_method = c.read_u8()?;
    let interlace_method = c.read_u8()?;

    if width == 0 || height == 0 {
      return Err(PngError::InvalidDimensions);
    }
    let color_type = PngColorType::try_from(raw_color_type)?;
    if !color_type.allows_bit_depth(bit_depth) {
      return Err(PngError::InvalidBitDepth { bit_depth, color_type: raw_color_type });
    }
    if compression_method != 0 {
      return Err(PngError::UnsupportedCompressionMethod(compression_method));
    }
    if filter_method != 0 {
      return Err(PngError::UnsupportedFilterMethod(filter_method));
    }
    if interlace_method > 1 {
      return Err(PngError::InvalidInterlaceMethod(interlace_method));
    }
    Ok(Self {
      width,
      height,
      bit_depth,
      color_type,
      compression_method,
      filter_method,
      interlace_method,
    })
  }
}
impl TryFrom<RawPngChunk<'_>> for IHDR {
  type Error = PngError;
  #[inline]
  fn try_from(raw: RawPngChunk<'_>) -> Result<Self, Self::Error> {
    if raw.chunk_type != PngChunkType::IHDR {
      return Err(PngError::MissingHeader);
    }
    IHDR::try_from(raw.data)
  }
}

/// The buffer shapes that follow from an [`IHDR`].
///
/// Decompressed data is `height` filterlines, each one filter byte followed by
/// `row_stride` bytes. Once unfiltered the filter bytes are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanlineGeometry {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits for each pixel, all channels
  pub bits_per_pixel: usize,
  /// offset to the "left" byte when unfiltering
  pub bytes_per_pixel: usize,
  /// bytes of pixel data per scanline, without the filter byte
  pub row_stride: usize,
}
impl ScanlineGeometry {
  /// Computes the geometry, using checked math all the way.
  ///
  /// ## Failure
  /// * [`PngError::DimensionsTooLarge`] if any size overflows `usize`.
  #[inline]
  pub fn from_header(header: &IHDR) -> PngResult<Self> {
    let bits_per_pixel = header.bits_per_pixel();
    let bits_per_line =
      bits_per_pixel.checked_mul(header.width as usize).ok_or(PngError::DimensionsTooLarge)?;
    let row_stride = (bits_per_line / 8) + (bits_per_line % 8 != 0) as usize;
    let geometry = Self {
      width: header.width,
      height: header.height,
      bits_per_pixel,
      bytes_per_pixel: header.bytes_per_pixel(),
      row_stride,
    };
    // make sure both buffer sizes can be computed later without overflow
    geometry.filtered_len().ok_or(PngError::DimensionsTooLarge)?;
    Ok(geometry)
  }

  /// Bytes per filterline: the filter byte plus a scanline.
  #[inline]
  #[must_use]
  pub const fn filterline_len(&self) -> usize {
    self.row_stride + 1
  }

  /// Total decompressed bytes: `height * (1 + row_stride)`.
  #[inline]
  #[must_use]
  pub fn filtered_len(&self) -> Option<usize> {
    self.row_stride.checked_add(1)?.checked_mul(self.height as usize)
  }

  /// Total unfiltered bytes: `height * row_stride`.
  #[inline]
  #[must_use]
  pub fn reconstructed_len(&self) -> Option<usize> {
    self.row_stride.checked_mul(self.height as usize)
  }
}
