#![allow(non_camel_case_types)]

use super::*;
use crate::RGB8;

/// The ancillary (and palette) chunks, parsed into their fields.
///
/// None of this is needed to decode the pixels, but a [`ChunkObserver`] can
/// use [`AncillaryChunk::parse`] to see what an image says about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AncillaryChunk<'b> {
  PLTE(PLTE<'b>),
  tRNS(tRNS<'b>),
  cHRM(cHRM),
  gAMA(gAMA),
  iCCP(iCCP<'b>),
  sBIT(sBIT),
  sRGB(sRGB),
  tEXt(tEXt<'b>),
  zTXt(zTXt<'b>),
  iTXt(iTXt<'b>),
  bKGD(bKGD),
  hIST(hIST<'b>),
  pHYs(pHYs),
  sPLT(sPLT<'b>),
  tIME(tIME),
  /// Any chunk type without a parser here.
  Unknown(PngChunkType),
}
impl<'b> AncillaryChunk<'b> {
  /// Parses a raw chunk.
  ///
  /// `bKGD`, `sBIT`, and `tRNS` are laid out differently for each color type.
  /// When the `header` is known they're read according to its color type,
  /// otherwise the layout is guessed from the payload length.
  ///
  /// ## Failure
  /// * [`ObserverError::Malformed`] if the payload doesn't fit the chunk type.
  pub fn parse(raw: &RawPngChunk<'b>, header: Option<&IHDR>) -> Result<Self, ObserverError> {
    let chunk_type = raw.chunk_type();
    let data = raw.data();
    let malformed = ObserverError::Malformed { chunk_type, len: data.len() };
    let color_type = header.map(|h| h.color_type);
    Ok(match chunk_type {
      PngChunkType::PLTE => {
        if data.is_empty() || data.len() % 3 != 0 || data.len() > 256 * 3 {
          return Err(malformed);
        }
        Self::PLTE(PLTE { entries: bytemuck::try_cast_slice(data).map_err(|_| malformed)? })
      }
      PngChunkType::tRNS => Self::tRNS(match (color_type, data) {
        (Some(PngColorType::Y) | None, &[y0, y1]) => tRNS::Y { y: u16::from_be_bytes([y0, y1]) },
        (Some(PngColorType::RGB) | None, &[r0, r1, g0, g1, b0, b1]) => tRNS::RGB {
          r: u16::from_be_bytes([r0, r1]),
          g: u16::from_be_bytes([g0, g1]),
          b: u16::from_be_bytes([b0, b1]),
        },
        (Some(PngColorType::Index) | None, alphas) if alphas.len() <= 256 => {
          tRNS::Index { alphas }
        }
        _ => return Err(malformed),
      }),
      PngChunkType::cHRM => {
        let v = be_u32s::<8>(data).ok_or(malformed)?;
        Self::cHRM(cHRM {
          white_x: v[0],
          white_y: v[1],
          red_x: v[2],
          red_y: v[3],
          green_x: v[4],
          green_y: v[5],
          blue_x: v[6],
          blue_y: v[7],
        })
      }
      PngChunkType::gAMA => {
        let [gamma] = be_u32s::<1>(data).ok_or(malformed)?;
        Self::gAMA(gAMA { gamma })
      }
      PngChunkType::iCCP => {
        let (name, rest) = split_keyword(data).ok_or(malformed)?;
        match rest {
          [0, zlib_data @ ..] => Self::iCCP(iCCP { name, zlib_data }),
          _ => return Err(malformed),
        }
      }
      PngChunkType::sBIT => Self::sBIT(match (color_type, data) {
        (Some(PngColorType::Y) | None, &[y]) => sBIT::Y { y },
        (Some(PngColorType::YA) | None, &[y, a]) => sBIT::YA { y, a },
        (Some(PngColorType::RGB | PngColorType::Index) | None, &[r, g, b]) => sBIT::RGB { r, g, b },
        (Some(PngColorType::RGBA) | None, &[r, g, b, a]) => sBIT::RGBA { r, g, b, a },
        _ => return Err(malformed),
      }),
      PngChunkType::sRGB => Self::sRGB(sRGB {
        intent: match *data {
          [0] => PngSrgbIntent::Perceptual,
          [1] => PngSrgbIntent::RelativeColorimetric,
          [2] => PngSrgbIntent::Saturation,
          [3] => PngSrgbIntent::AbsoluteColorimetric,
          _ => return Err(malformed),
        },
      }),
      PngChunkType::tEXt => {
        let (keyword, text) = split_keyword(data).ok_or(malformed)?;
        Self::tEXt(tEXt { keyword, text })
      }
      PngChunkType::zTXt => {
        let (keyword, rest) = split_keyword(data).ok_or(malformed)?;
        match rest {
          [0, zlib_data @ ..] => Self::zTXt(zTXt { keyword, zlib_data }),
          _ => return Err(malformed),
        }
      }
      PngChunkType::iTXt => {
        let (keyword, rest) = split_keyword(data).ok_or(malformed)?;
        let (text_is_compressed, rest) = match rest {
          [0, 0, rest @ ..] => (false, rest),
          [1, 0, rest @ ..] => (true, rest),
          _ => return Err(malformed),
        };
        let (language_tag, rest) = split_nul(rest).ok_or(malformed)?;
        let (translated_keyword, text) = split_nul(rest).ok_or(malformed)?;
        let translated_keyword = core::str::from_utf8(translated_keyword).map_err(|_| malformed)?;
        Self::iTXt(iTXt { keyword, text_is_compressed, language_tag, translated_keyword, text })
      }
      PngChunkType::bKGD => Self::bKGD(match (color_type, data) {
        (Some(PngColorType::Index) | None, &[i]) => bKGD::Index { i },
        (Some(PngColorType::Y | PngColorType::YA) | None, &[y0, y1]) => {
          bKGD::Y { y: u16::from_be_bytes([y0, y1]) }
        }
        (Some(PngColorType::RGB | PngColorType::RGBA) | None, &[r0, r1, g0, g1, b0, b1]) => {
          bKGD::RGB {
            r: u16::from_be_bytes([r0, r1]),
            g: u16::from_be_bytes([g0, g1]),
            b: u16::from_be_bytes([b0, b1]),
          }
        }
        _ => return Err(malformed),
      }),
      PngChunkType::hIST => {
        if data.is_empty() || data.len() % 2 != 0 {
          return Err(malformed);
        }
        Self::hIST(hIST { data })
      }
      PngChunkType::pHYs => match *data {
        [x0, x1, x2, x3, y0, y1, y2, y3, unit @ (0 | 1)] => Self::pHYs(pHYs {
          ppu_x: u32::from_be_bytes([x0, x1, x2, x3]),
          ppu_y: u32::from_be_bytes([y0, y1, y2, y3]),
          is_meters: unit == 1,
        }),
        _ => return Err(malformed),
      },
      PngChunkType::sPLT => {
        let (palette_name, rest) = split_keyword(data).ok_or(malformed)?;
        let (is_16bit, entries) = match rest {
          [8, entries @ ..] => (false, entries),
          [16, entries @ ..] => (true, entries),
          _ => return Err(malformed),
        };
        let entry_len = if is_16bit { 10 } else { 6 };
        if entries.len() % entry_len != 0 {
          return Err(malformed);
        }
        Self::sPLT(sPLT { palette_name, is_16bit, entries })
      }
      PngChunkType::tIME => match *data {
        [y0, y1, month @ 1..=12, day @ 1..=31, hour @ 0..=23, minute @ 0..=59, second @ 0..=60] => {
          Self::tIME(tIME { year: u16::from_be_bytes([y0, y1]), month, day, hour, minute, second })
        }
        _ => return Err(malformed),
      },
      other => Self::Unknown(other),
    })
  }
}

/// Reads exactly `N` big-endian `u32` values.
fn be_u32s<const N: usize>(data: &[u8]) -> Option<[u32; N]> {
  if data.len() != N * 4 {
    return None;
  }
  let mut out = [0_u32; N];
  let mut c = ByteCursor::new(data);
  for v in out.iter_mut() {
    *v = c.read_u32_be().ok()?;
  }
  Some(out)
}

/// Splits at the first 0 byte, dropping the 0.
fn split_nul(data: &[u8]) -> Option<(&[u8], &[u8])> {
  let i = data.iter().position(|&b| b == 0)?;
  Some((&data[..i], &data[i + 1..]))
}

/// Keywords are 1 to 79 bytes, then a 0 byte.
fn split_keyword(data: &[u8]) -> Option<(&[u8], &[u8])> {
  let (keyword, rest) = split_nul(data)?;
  if (1..=79).contains(&keyword.len()) {
    Some((keyword, rest))
  } else {
    None
  }
}

/// `PLTE`: Palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PLTE<'b> {
  /// Between 1 and 256 entries.
  pub entries: &'b [RGB8],
}

/// `tRNS`: Transparency
///
/// * `Y` and `RGB` each store a single color. All samples of that color in the
///   image are fully transparent, while the rest are fully opaque. The value is
///   always stored as a `u16`, even if the image's bit depth is smaller.
/// * `Index` has one alpha per palette entry. Palette entries past the end of
///   the slice are fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum tRNS<'b> {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { alphas: &'b [u8] },
}

/// `cHRM`: Primary chromaticities and white point
///
/// Values are stored as 100,000 times the floating point value.
///
/// **Example:** A value of 0.3127 would be stored as the integer 31270.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct cHRM {
  pub white_x: u32,
  pub white_y: u32,
  pub red_x: u32,
  pub red_y: u32,
  pub green_x: u32,
  pub green_y: u32,
  pub blue_x: u32,
  pub blue_y: u32,
}

/// `gAMA`: Image gamma
///
/// Stored as 100,000 times the floating point value, so a gamma of 1/2.2 is
/// 45,455.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct gAMA {
  pub gamma: u32,
}

/// `iCCP`: Embedded ICC profile
///
/// The profile is left compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct iCCP<'b> {
  /// Latin-1 profile name.
  pub name: &'b [u8],
  /// Zlib stream of the profile.
  pub zlib_data: &'b [u8],
}

/// `sBIT`: Significant bits per channel of the original image.
///
/// Indexed color images use the `RGB` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum sBIT {
  Y { y: u8 },
  YA { y: u8, a: u8 },
  RGB { r: u8, g: u8, b: u8 },
  RGBA { r: u8, g: u8, b: u8, a: u8 },
}

/// `sRGB`: Standard RGB color space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct sRGB {
  pub intent: PngSrgbIntent,
}

/// Rendering intent of an [`sRGB`] chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PngSrgbIntent {
  Perceptual,
  RelativeColorimetric,
  Saturation,
  AbsoluteColorimetric,
}

/// `tEXt`: Latin-1 text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct tEXt<'b> {
  pub keyword: &'b [u8],
  pub text: &'b [u8],
}

/// `zTXt`: Compressed Latin-1 text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct zTXt<'b> {
  pub keyword: &'b [u8],
  pub zlib_data: &'b [u8],
}

/// `iTXt`: International (UTF-8) text
///
/// When `text_is_compressed` is set the `text` is a zlib stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct iTXt<'b> {
  pub keyword: &'b [u8],
  pub text_is_compressed: bool,
  pub language_tag: &'b [u8],
  pub translated_keyword: &'b str,
  pub text: &'b [u8],
}

/// `bKGD`: Background color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum bKGD {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { i: u8 },
}

/// `hIST`: Palette histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct hIST<'b> {
  /// Big-endian `u16` frequencies, one per palette entry.
  pub data: &'b [u8],
}
impl hIST<'_> {
  /// The frequencies in palette order.
  #[inline]
  pub fn frequencies(&self) -> impl Iterator<Item = u16> + '_ {
    self.data.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]))
  }
}

/// `pHYs`: Physical pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct pHYs {
  /// pixels per unit, x axis
  pub ppu_x: u32,
  /// pixels per unit, y axis
  pub ppu_y: u32,
  /// otherwise the unit is unknown, and this only gives an aspect ratio
  pub is_meters: bool,
}

/// `sPLT`: Suggested palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct sPLT<'b> {
  /// Latin-1 name.
  pub palette_name: &'b [u8],
  /// Entries are 10 bytes when set, 6 bytes otherwise.
  pub is_16bit: bool,
  /// Raw entry bytes: color channels, alpha, then a `u16` frequency.
  pub entries: &'b [u8],
}

/// `tIME`: Image last-modification time (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct tIME {
  pub year: u16,
  pub month: u8,
  pub day: u8,
  pub hour: u8,
  pub minute: u8,
  /// can be 60, for leap seconds
  pub second: u8,
}
