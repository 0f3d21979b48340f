//! A forward-only reader over a byte slice.

use crate::{PngError, PngResult};

/// Reads bytes off the front of a slice, front to back.
///
/// Every read either gets exactly what it asked for or fails with
/// [`PngError::TruncatedInput`], which says where the read started and how
/// short the input was. A failed read doesn't move the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteCursor<'b> {
  bytes: &'b [u8],
  position: usize,
}
impl<'b> ByteCursor<'b> {
  /// Makes a cursor at the start of `bytes`.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, position: 0 }
  }

  /// How many bytes have been read so far.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.position
  }

  /// How many bytes are left to read.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> usize {
    self.bytes.len() - self.position
  }

  /// If there's nothing left to read.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  /// Takes the next `n` bytes.
  #[inline]
  pub fn read_exact(&mut self, n: usize) -> PngResult<&'b [u8]> {
    let rest = &self.bytes[self.position..];
    if rest.len() >= n {
      let (head, _) = rest.split_at(n);
      self.position += n;
      Ok(head)
    } else {
      Err(PngError::TruncatedInput { offset: self.position, needed: n, remaining: rest.len() })
    }
  }

  /// Takes the next `N` bytes as an array.
  #[inline]
  pub fn read_array<const N: usize>(&mut self) -> PngResult<[u8; N]> {
    let head = self.read_exact(N)?;
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Ok(a)
  }

  /// Reads an `n` byte big-endian unsigned integer, `n` in `1..=4`.
  ///
  /// PNG fields aren't all 4 bytes wide, so the narrower widths are here too.
  #[inline]
  pub fn read_uint(&mut self, n: usize) -> PngResult<u32> {
    if !(1..=4).contains(&n) {
      return Err(PngError::UnsupportedIntWidth(n));
    }
    Ok(self.read_exact(n)?.iter().fold(0_u32, |acc, b| (acc << 8) | u32::from(*b)))
  }

  /// Reads one byte.
  #[inline]
  pub fn read_u8(&mut self) -> PngResult<u8> {
    let [b] = self.read_array::<1>()?;
    Ok(b)
  }

  /// Reads a big-endian `u16`.
  #[inline]
  pub fn read_u16_be(&mut self) -> PngResult<u16> {
    self.read_array::<2>().map(u16::from_be_bytes)
  }

  /// Reads a big-endian `u32`.
  #[inline]
  pub fn read_u32_be(&mut self) -> PngResult<u32> {
    self.read_array::<4>().map(u32::from_be_bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_uint_widths() {
    let mut c = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A]);
    assert_eq!(c.read_uint(1), Ok(0x01));
    assert_eq!(c.read_uint(2), Ok(0x0203));
    assert_eq!(c.read_uint(3), Ok(0x04_0506));
    assert_eq!(c.read_uint(4), Ok(0x0708_090A));
    assert!(c.is_empty());
    assert_eq!(c.read_uint(0), Err(PngError::UnsupportedIntWidth(0)));
    assert_eq!(c.read_uint(5), Err(PngError::UnsupportedIntWidth(5)));
  }

  #[test]
  fn test_short_read_reports_location() {
    let mut c = ByteCursor::new(&[1, 2, 3]);
    assert_eq!(c.read_exact(2), Ok(&[1_u8, 2][..]));
    assert_eq!(
      c.read_u32_be(),
      Err(PngError::TruncatedInput { offset: 2, needed: 4, remaining: 1 })
    );
    // the failed read didn't consume anything
    assert_eq!(c.position(), 2);
    assert_eq!(c.read_u8(), Ok(3));
    assert_eq!(c.remaining(), 0);
  }

  #[test]
  fn test_zero_length_read() {
    let mut c = ByteCursor::new(&[]);
    assert_eq!(c.read_exact(0), Ok(&[][..]));
    assert!(c.read_u8().is_err());
  }
}
