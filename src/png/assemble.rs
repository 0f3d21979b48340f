use super::*;

/// What to do with the alpha channel of greyscale + alpha images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GrayAlpha {
  /// Keep the alpha stored in the image.
  #[default]
  Preserve,
  /// Throw away the stored alpha and make every pixel fully opaque.
  Opaque,
}

/// Converts reconstructed scanlines into 8-bit pixels.
///
/// | color type | output |
/// |:-|:-|
/// | 0 (Y) | [`Y8`](crate::Y8) |
/// | 2 (RGB) | [`RGBA8`](crate::RGBA8), alpha 255 |
/// | 4 (YA) | [`YA8`](crate::YA8), alpha according to `gray_alpha` |
/// | 6 (RGBA) | [`RGBA8`](crate::RGBA8) |
///
/// 16-bit samples are big-endian, so the first byte of each sample is the high
/// byte, and that's the one that's kept.
///
/// ## Failure
/// * The same unsupported formats as [`IHDR::check_supported`].
/// * [`PngError::TruncatedScanlines`] if `reconstructed` is too short for the
///   image.
pub fn assemble_pixels(
  reconstructed: &[u8], header: &IHDR, gray_alpha: GrayAlpha,
) -> PngResult<PixelBuffer> {
  header.check_supported()?;
  let sample_bytes = usize::from(header.bit_depth / 8);
  let in_bpp = header.color_type.channel_count() * sample_bytes;
  let layout = match header.color_type {
    PngColorType::Y => PixelLayout::Y8,
    PngColorType::YA => PixelLayout::YA8,
    PngColorType::RGB | PngColorType::RGBA => PixelLayout::RGBA8,
    PngColorType::Index => return Err(PngError::UnsupportedColorType(header.color_type as u8)),
  };
  let pixel_count = (header.width as usize)
    .checked_mul(header.height as usize)
    .ok_or(PngError::DimensionsTooLarge)?;
  let in_len = pixel_count.checked_mul(in_bpp).ok_or(PngError::DimensionsTooLarge)?;
  if reconstructed.len() < in_len {
    let in_stride = (header.width as usize) * in_bpp;
    return Err(PngError::TruncatedScanlines { row: (reconstructed.len() / in_stride) as u32 });
  }
  let out_len =
    pixel_count.checked_mul(layout.bytes_per_pixel()).ok_or(PngError::DimensionsTooLarge)?;
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(out_len)?;

  let pixels = reconstructed[..in_len].chunks_exact(in_bpp);
  // sample `i` of a pixel, high byte only
  let s = |px: &[u8], i: usize| px[i * sample_bytes];
  match header.color_type {
    PngColorType::Y => pixels.for_each(|px| out.push(s(px, 0))),
    PngColorType::YA => pixels.for_each(|px| {
      let a = match gray_alpha {
        GrayAlpha::Preserve => s(px, 1),
        GrayAlpha::Opaque => u8::MAX,
      };
      out.extend_from_slice(&[s(px, 0), a]);
    }),
    PngColorType::RGB => {
      pixels.for_each(|px| out.extend_from_slice(&[s(px, 0), s(px, 1), s(px, 2), u8::MAX]))
    }
    PngColorType::RGBA => {
      pixels.for_each(|px| out.extend_from_slice(&[s(px, 0), s(px, 1), s(px, 2), s(px, 3)]))
    }
    PngColorType::Index => return Err(PngError::UnsupportedColorType(header.color_type as u8)),
  }
  PixelBuffer::new(header.width, header.height, layout, out).ok_or(PngError::DimensionsTooLarge)
}
