use super::*;

/// The per-scanline filter types of PNG filter method 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  /// The bytes are stored as-is.
  None = 0,
  /// Difference from the byte one pixel to the left.
  Sub = 1,
  /// Difference from the byte above.
  Up = 2,
  /// Difference from the floored mean of left and above.
  Average = 3,
  /// Difference from the [Paeth predictor](paeth_predict).
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  /// The unknown filter byte.
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}

/// Picks whichever of left (`a`), above (`b`), or upper-left (`c`) is closest
/// to `a + b - c`.
///
/// Ties go to `a`, then `b`, then `c`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: the order of these tests is fixed by the format, don't reorder them.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses one filter on one scanline, in place.
///
/// * `line` holds the filtered bytes of this row (no filter byte).
/// * `prev` is the fully reconstructed row above, all zeroes for the first row.
/// * `bytes_per_pixel` is how far back the "left" byte is. Bytes closer to the
///   start of the row than that have a left (and upper-left) of 0.
///
/// All the math wraps at 256.
///
/// ## Panics
/// * If `prev` is shorter than `line`.
pub fn unfilter_line(filter: FilterType, bytes_per_pixel: usize, line: &mut [u8], prev: &[u8]) {
  let bpp = bytes_per_pixel.max(1);
  let prev = &prev[..line.len()];
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for i in bpp..line.len() {
        line[i] = line[i].wrapping_add(line[i - bpp]);
      }
    }
    FilterType::Up => {
      line.iter_mut().zip(prev.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
    }
    FilterType::Average => {
      // the first pixel has no left neighbor
      let head = bpp.min(line.len());
      line[..head]
        .iter_mut()
        .zip(prev.iter().copied())
        .for_each(|(p, b)| *p = p.wrapping_add(b / 2));
      for i in head..line.len() {
        let a = u16::from(line[i - bpp]);
        let b = u16::from(prev[i]);
        line[i] = line[i].wrapping_add(((a + b) / 2) as u8);
      }
    }
    FilterType::Paeth => {
      // with no left neighbor the predictor always picks `b`
      let head = bpp.min(line.len());
      line[..head]
        .iter_mut()
        .zip(prev.iter().copied())
        .for_each(|(p, b)| *p = p.wrapping_add(paeth_predict(0, b, 0)));
      for i in head..line.len() {
        let a = line[i - bpp];
        let b = prev[i];
        let c = prev[i - bpp];
        line[i] = line[i].wrapping_add(paeth_predict(a, b, c));
      }
    }
  }
}

/// Unfilters all of the decompressed scanlines into `out`.
///
/// `filtered` is `height` filterlines, each a filter byte then
/// `row_stride` bytes. `out` gets `height` rows of `row_stride` bytes, with no
/// filter bytes.
///
/// Each row depends on the fully reconstructed row above it, so the rows go
/// strictly top to bottom. The row above lives in its own buffer, separate from
/// both `filtered` and `out`, and is swapped out for the just-finished row after
/// every line.
///
/// ## Failure
/// * [`PngError::InvalidDimensions`] if the geometry has no rows or an empty
///   row stride.
/// * [`PngError::TruncatedScanlines`] if `filtered` doesn't hold every row.
///   This is checked before anything is written.
/// * [`PngError::UnknownFilterType`] if a filter byte isn't 0 through 4. Rows
///   before the bad one will already be in `out`, rows after it are untouched.
/// * [`PngError::DimensionsTooLarge`] if `out` is shorter than
///   `height * row_stride`, or that size doesn't fit in a `usize`. Nothing is
///   written.
///
/// Extra bytes after the last filterline are ignored.
pub fn reconstruct_scanlines(
  filtered: &[u8], geometry: &ScanlineGeometry, out: &mut [u8],
) -> PngResult<()> {
  let stride = geometry.row_stride;
  let height = geometry.height as usize;
  if stride == 0 || height == 0 {
    return Err(PngError::InvalidDimensions);
  }
  let filterline_len = geometry.filterline_len();
  let full_rows = filtered.len() / filterline_len;
  if full_rows < height {
    return Err(PngError::TruncatedScanlines { row: full_rows as u32 });
  }
  let used = filterline_len * height;
  if filtered.len() > used {
    warn!("ignoring {} bytes after the last scanline", filtered.len() - used);
  }
  let needed = geometry.reconstructed_len().ok_or(PngError::DimensionsTooLarge)?;
  if out.len() < needed {
    return Err(PngError::DimensionsTooLarge);
  }

  let mut prev: Vec<u8> = Vec::new();
  prev.try_reserve_exact(stride)?;
  prev.resize(stride, 0);
  let mut current: Vec<u8> = Vec::new();
  current.try_reserve_exact(stride)?;
  current.resize(stride, 0);

  let lines = filtered[..used].chunks_exact(filterline_len);
  let out_rows = out.chunks_exact_mut(stride);
  for (y, (filterline, out_row)) in lines.zip(out_rows).enumerate() {
    let (f, pixels) = filterline.split_at(1);
    let filter = FilterType::try_from(f[0])
      .map_err(|filter| PngError::UnknownFilterType { row: y as u32, filter })?;
    current.copy_from_slice(pixels);
    unfilter_line(filter, geometry.bytes_per_pixel, &mut current, &prev);
    out_row.copy_from_slice(&current);
    core::mem::swap(&mut prev, &mut current);
  }
  Ok(())
}

/// Unfilters the decompressed scanlines into a new buffer.
///
/// See [`reconstruct_scanlines`] for the details and failure cases.
pub fn unfilter(filtered: &[u8], geometry: &ScanlineGeometry) -> PngResult<Vec<u8>> {
  let len = geometry.reconstructed_len().ok_or(PngError::DimensionsTooLarge)?;
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(len)?;
  out.resize(len, 0);
  reconstruct_scanlines(filtered, geometry, &mut out)?;
  Ok(out)
}
