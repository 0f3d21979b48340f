//! Module for pixel formats.
//!
//! There's two main factors with a pixel format:
//! * **Channels:** generally one or more of red, green, blue, and alpha. Some
//!   formats only use gray, marked as "Y" in format names.
//! * **Bit Depth:** how many bits per channel. Every format the decoder
//!   produces is 8 bits per channel. Images stored at 16 bits per channel keep
//!   only the high byte of each sample.
//!
//! All the types here are `#[repr(C)]` with an alignment of 1, so a byte slice
//! of the right length can be cast to a slice of pixels with [`bytemuck`].

use bytemuck::{Pod, Zeroable};

/// An 8-bit greyscale pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct Y8 {
  pub y: u8,
}

/// An 8-bits per channel greyscale + alpha pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct YA8 {
  pub y: u8,
  pub a: u8,
}

/// An RGB value, 8-bits per channel.
///
/// This is what palette entries look like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

/// The layout of the pixels in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelLayout {
  /// One byte per pixel, see [`Y8`].
  Y8,
  /// Two bytes per pixel, see [`YA8`].
  YA8,
  /// Four bytes per pixel, see [`RGBA8`].
  RGBA8,
}
impl PixelLayout {
  /// Bytes used by each pixel of this layout.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    match self {
      Self::Y8 => 1,
      Self::YA8 => 2,
      Self::RGBA8 => 4,
    }
  }
}

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// pixel index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A decoded image: dimensions, a layout, and the pixel bytes.
///
/// Pixels are stored row-major, top row first, with no padding between rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
  width: u32,
  height: u32,
  layout: Option<PixelLayout>,
  bytes: alloc::vec::Vec<u8>,
}
impl PixelBuffer {
  /// Wraps up some pixel bytes.
  ///
  /// ## Failure
  /// * `None` if `bytes` isn't exactly `width * height` pixels of `layout`.
  #[inline]
  #[must_use]
  pub fn new(
    width: u32, height: u32, layout: PixelLayout, bytes: alloc::vec::Vec<u8>,
  ) -> Option<Self> {
    let expected = (width as usize)
      .checked_mul(height as usize)?
      .checked_mul(layout.bytes_per_pixel())?;
    if bytes.len() == expected {
      Some(Self { width, height, layout: Some(layout), bytes })
    } else {
      None
    }
  }
  /// Width in pixels.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }
  /// Height in pixels.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }
  /// The pixel layout, or `None` for an empty default buffer.
  #[inline]
  #[must_use]
  pub const fn layout(&self) -> Option<PixelLayout> {
    self.layout
  }
  /// Bytes per output row.
  #[inline]
  #[must_use]
  pub fn stride(&self) -> usize {
    match self.layout {
      Some(layout) => (self.width as usize) * layout.bytes_per_pixel(),
      None => 0,
    }
  }
  /// All of the pixel bytes.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }
  /// Unwraps the pixel bytes.
  #[inline]
  #[must_use]
  pub fn into_bytes(self) -> alloc::vec::Vec<u8> {
    self.bytes
  }
  /// One row of pixel bytes, if `y` is in bounds.
  #[inline]
  #[must_use]
  pub fn row(&self, y: u32) -> Option<&[u8]> {
    if y < self.height {
      let stride = self.stride();
      let start = (y as usize) * stride;
      self.bytes.get(start..start + stride)
    } else {
      None
    }
  }
  /// Views the bytes as pixels of type `P`.
  ///
  /// `None` when `P` doesn't match the buffer's layout size.
  #[inline]
  #[must_use]
  pub fn pixels<P: Pod>(&self) -> Option<&[P]> {
    let layout = self.layout?;
    if core::mem::size_of::<P>() != layout.bytes_per_pixel() {
      return None;
    }
    bytemuck::try_cast_slice(&self.bytes).ok()
  }
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds or `P` is the wrong size.
  #[inline]
  #[must_use]
  pub fn get<P: Pod>(&self, x: u32, y: u32) -> Option<P> {
    if x < self.width && y < self.height {
      self.pixels::<P>()?.get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }
}
