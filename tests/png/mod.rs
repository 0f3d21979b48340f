use miniz_oxide::deflate::compress_to_vec_zlib;
use pngcore::{
  decode_png,
  png::{png_crc, LogObserver, PngChunkType, RawPngChunkIter, PNG_SIGNATURE},
  DecodeOptions, GrayAlpha, PixelLayout, PngDecoder, PngError, RGBA8,
};
use walkdir::WalkDir;

/// Builds PNG bytes one chunk at a time, with correct lengths and CRCs.
struct PngBuilder(Vec<u8>);
impl PngBuilder {
  fn new() -> Self {
    Self(PNG_SIGNATURE.to_vec())
  }
  fn chunk(mut self, chunk_type: &[u8; 4], data: &[u8]) -> Self {
    self.0.extend_from_slice(&(data.len() as u32).to_be_bytes());
    self.0.extend_from_slice(chunk_type);
    self.0.extend_from_slice(data);
    let crc = png_crc(chunk_type.iter().copied().chain(data.iter().copied()));
    self.0.extend_from_slice(&crc.to_be_bytes());
    self
  }
  fn ihdr(self, width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Self {
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);
    self.chunk(b"IHDR", &data)
  }
  fn idat(self, filtered: &[u8]) -> Self {
    self.chunk(b"IDAT", &compress_to_vec_zlib(filtered, 6))
  }
  fn iend(self) -> Vec<u8> {
    self.chunk(b"IEND", &[]).0
  }
}

fn simple_png(width: u32, height: u32, bit_depth: u8, color_type: u8, filtered: &[u8]) -> Vec<u8> {
  PngBuilder::new().ihdr(width, height, bit_depth, color_type, 0).idat(filtered).iend()
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    if let Ok(it) = RawPngChunkIter::new(&v) {
      for _ in it {
        //
      }
    }
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let mut v = super::rand_bytes(1024);
    v[..8].copy_from_slice(&PNG_SIGNATURE);
    for _ in RawPngChunkIter::new(&v).unwrap() {
      //
    }
  }
}

#[test]
fn test_decode_png_no_panics() {
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    assert!(decode_png(&v).is_err());
  }
  // a good header followed by garbage
  let good = simple_png(4, 4, 8, 6, &[0; 4 * 17]);
  for _ in 0..10 {
    let mut v = good[..33].to_vec();
    v.extend(super::rand_bytes(512));
    let _ = decode_png(&v);
  }
  // every possible truncation of a real image
  for end in 0..good.len() {
    assert!(decode_png(&good[..end]).is_err(), "cut at {end}");
  }
}

#[test]
fn test_decode_gray_2x2() {
  let png = simple_png(2, 2, 8, 0, &[0, 0x10, 0x20, 0, 0x30, 0x40]);
  let (pixels, header) = decode_png(&png).unwrap();
  assert_eq!((header.width, header.height), (2, 2));
  assert_eq!(pixels.layout(), Some(PixelLayout::Y8));
  assert_eq!(pixels.as_bytes(), &[0x10, 0x20, 0x30, 0x40]);
}

#[test]
fn test_decode_rgba_1x1() {
  let png = simple_png(1, 1, 8, 6, &[0, 10, 20, 30, 40]);
  let (pixels, _) = decode_png(&png).unwrap();
  assert_eq!(pixels.as_bytes(), &[10, 20, 30, 40]);
  assert_eq!(pixels.get::<RGBA8>(0, 0), Some(RGBA8 { r: 10, g: 20, b: 30, a: 40 }));
}

#[test]
fn test_output_size_matches_header() {
  for (color_type, bit_depth, out_bpp) in [(0, 8, 1), (0, 16, 1), (2, 8, 4), (4, 8, 2), (6, 16, 4)] {
    let (width, height) = (5_u32, 3_u32);
    let channels = [1, 0, 3, 0, 2, 0, 4][color_type as usize];
    let stride = width as usize * channels * (bit_depth as usize / 8);
    let mut filtered = Vec::new();
    for y in 0..height as usize {
      filtered.push((y % 5) as u8);
      filtered.extend((0..stride).map(|x| (x * 7 + y) as u8));
    }
    let png = simple_png(width, height, bit_depth, color_type, &filtered);
    let (pixels, header) = decode_png(&png).unwrap();
    assert_eq!((pixels.width(), pixels.height()), (header.width, header.height));
    assert_eq!(pixels.as_bytes().len(), (width * height) as usize * out_bpp);
    assert_eq!(pixels.stride(), width as usize * out_bpp);
  }
}

#[test]
fn test_decode_is_deterministic() {
  let mut filtered = Vec::new();
  for (y, f) in [1_u8, 2, 3, 4].into_iter().enumerate() {
    filtered.push(f);
    filtered.extend((0..9).map(|x| (x * 31 + y * 17) as u8));
  }
  let png = simple_png(3, 4, 8, 2, &filtered);
  let first = decode_png(&png).unwrap();
  let second = decode_png(&png).unwrap();
  assert_eq!(first, second);
  let mut decoder = PngDecoder::new(&png);
  assert_eq!(decoder.decode().unwrap(), first.0);
  assert_eq!(decoder.decode().unwrap(), first.0);
}

#[test]
fn test_multiple_idat_chunks() {
  let filtered: Vec<u8> =
    (0..16).flat_map(|y| core::iter::once(0).chain((0..16).map(move |x| (x ^ y) as u8))).collect();
  let z = compress_to_vec_zlib(&filtered, 6);
  let mut b = PngBuilder::new().ihdr(16, 16, 8, 0, 0).chunk(b"IDAT", &[]);
  for piece in z.chunks(5) {
    b = b.chunk(b"IDAT", piece);
  }
  let (pixels, _) = decode_png(&b.iend()).unwrap();
  assert_eq!(pixels.row(3).unwrap()[5], 3 ^ 5);
  assert_eq!(pixels.as_bytes().len(), 256);
}

#[test]
fn test_unsupported_images() {
  let indexed = PngBuilder::new()
    .ihdr(1, 1, 8, 3, 0)
    .chunk(b"PLTE", &[255, 0, 0])
    .idat(&[0, 0])
    .iend();
  assert_eq!(decode_png(&indexed), Err(PngError::UnsupportedColorType(3)));

  let interlaced = PngBuilder::new().ihdr(1, 1, 8, 0, 1).idat(&[0, 0]).iend();
  assert_eq!(decode_png(&interlaced), Err(PngError::UnsupportedInterlace));

  let one_bit = simple_png(8, 1, 1, 0, &[0, 0xFF]);
  assert_eq!(decode_png(&one_bit), Err(PngError::UnsupportedBitDepth(1)));
}

#[test]
fn test_truncated_chunk_header() {
  let png = simple_png(1, 1, 8, 0, &[0, 0]);
  // partway into the length of the chunk after IHDR
  let cut = &png[..8 + 25 + 2];
  assert_eq!(
    decode_png(cut),
    Err(PngError::TruncatedInput { offset: 33, needed: 4, remaining: 2 })
  );
}

#[test]
fn test_bad_filter_type() {
  let png = simple_png(2, 2, 8, 0, &[0, 1, 2, 5, 3, 4]);
  assert_eq!(decode_png(&png), Err(PngError::UnknownFilterType { row: 1, filter: 5 }));
}

#[test]
fn test_short_image_data() {
  let png = simple_png(2, 2, 8, 0, &[0, 1, 2]);
  assert_eq!(decode_png(&png), Err(PngError::TruncatedScanlines { row: 1 }));
}

#[test]
fn test_gray_alpha_option() {
  let png = simple_png(2, 1, 8, 4, &[0, 50, 100, 150, 200]);
  let (kept, _) = decode_png(&png).unwrap();
  assert_eq!(kept.as_bytes(), &[50, 100, 150, 200]);
  let opaque = PngDecoder::new(&png)
    .with_options(DecodeOptions::default().set_gray_alpha(GrayAlpha::Opaque))
    .decode()
    .unwrap();
  assert_eq!(opaque.as_bytes(), &[50, 255, 150, 255]);
}

#[test]
fn test_crc_checking_is_opt_in() {
  let mut png = simple_png(1, 1, 8, 0, &[0, 77]);
  // last byte of the IHDR crc
  png[8 + 25 - 1] ^= 0x01;
  assert_eq!(decode_png(&png).unwrap().0.as_bytes(), &[77]);
  let checked = PngDecoder::new(&png).with_options(DecodeOptions::new().set_verify_crc(true)).decode();
  assert!(matches!(
    checked,
    Err(PngError::ChunkCrcMismatch { chunk_type: PngChunkType::IHDR, .. })
  ));
}

#[test]
fn test_observer_failures_dont_stop_decoding() {
  let png = PngBuilder::new()
    .ihdr(1, 1, 8, 2, 0)
    .chunk(b"gAMA", &[1, 2, 3])
    .chunk(b"tIME", &[0x07, 0xE6, 13, 1, 0, 0, 0])
    .chunk(b"sRGB", &[0])
    .idat(&[0, 1, 2, 3])
    .iend();
  let mut decoder = PngDecoder::new(&png);
  let pixels = decoder.decode_with(&mut LogObserver).unwrap();
  assert_eq!(pixels.as_bytes(), &[1, 2, 3, 255]);
  let failed: Vec<PngChunkType> = decoder.observer_failures().iter().map(|f| f.chunk_type).collect();
  assert_eq!(failed, [PngChunkType::gAMA, PngChunkType::tIME]);
}

#[test]
fn test_16_bit_gray() {
  let png = simple_png(2, 1, 16, 0, &[0, 0xAB, 0xCD, 0x01, 0x02]);
  let (pixels, header) = decode_png(&png).unwrap();
  assert_eq!(header.bit_depth, 16);
  assert_eq!(pixels.as_bytes(), &[0xAB, 0x01]);
}

#[test]
fn test_wide_image_decodes_by_default() {
  let mut filtered = vec![0; 20_001];
  filtered[20_000] = 9;
  let (pixels, header) = decode_png(&simple_png(20_000, 1, 8, 0, &filtered)).unwrap();
  assert_eq!(header.width, 20_000);
  assert_eq!(pixels.as_bytes().len(), 20_000);
  assert_eq!(pixels.as_bytes()[19_999], 9);
}

#[test]
fn test_oversized_image_data_is_capped() {
  // a 1x1 image whose IDAT inflates to a whole MiB
  let mut filtered = vec![0_u8; 1 << 20];
  filtered[1] = 77;
  let png = PngBuilder::new().ihdr(1, 1, 8, 0, 0).idat(&filtered).iend();
  assert!(png.len() < (1 << 14));
  let (pixels, _) = decode_png(&png).unwrap();
  assert_eq!(pixels.as_bytes(), &[77]);
}
