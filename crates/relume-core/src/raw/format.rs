//! Binary raw float-image format.
//!
//! Fixed 32-bit big-endian layout:
//! ```text
//! i32  major version
//! i32  minor version
//! i32  width
//! i32  height
//! width × height pixels, row-major, each { f32 r, f32 g, f32 b }
//! ```
//! No trailing data; EOF before all pixel triplets are read is a load
//! failure.

use std::io::Read;

/// Raw image loading failures. The caller's previous image (if any) is
/// never touched; loading builds a fresh value or fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read raw image stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("pixel count {width}x{height} overflows addressable memory")]
    PixelCountOverflow { width: i32, height: i32 },
}

/// Decoded file header. The version pair is informational only.
#[derive(Debug, Clone, Copy)]
pub struct RawHeader {
    pub major_version: i32,
    pub minor_version: i32,
    pub width: u32,
    pub height: u32,
}

impl RawHeader {
    pub fn pixel_count(&self) -> usize {
        // Validated against overflow in read_header.
        self.width as usize * self.height as usize
    }
}

/// Read and validate the 16-byte header.
pub fn read_header<R: Read>(reader: &mut R) -> Result<RawHeader, LoadError> {
    let major_version = read_i32_be(reader)?;
    let minor_version = read_i32_be(reader)?;
    let width = read_i32_be(reader)?;
    let height = read_i32_be(reader)?;

    if width <= 0 || height <= 0 {
        return Err(LoadError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(LoadError::PixelCountOverflow { width, height })?;

    Ok(RawHeader {
        major_version,
        minor_version,
        width: width as u32,
        height: height as u32,
    })
}

/// Read `count` RGB float triplets into three channel buffers.
pub fn read_pixels<R: Read>(
    reader: &mut R,
    count: usize,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), LoadError> {
    let mut r = Vec::with_capacity(count);
    let mut g = Vec::with_capacity(count);
    let mut b = Vec::with_capacity(count);

    let mut triplet = [0u8; 12];
    for _ in 0..count {
        reader.read_exact(&mut triplet)?;
        r.push(f64::from(f32::from_be_bytes([
            triplet[0], triplet[1], triplet[2], triplet[3],
        ])));
        g.push(f64::from(f32::from_be_bytes([
            triplet[4], triplet[5], triplet[6], triplet[7],
        ])));
        b.push(f64::from(f32::from_be_bytes([
            triplet[8], triplet[9], triplet[10], triplet[11],
        ])));
    }

    Ok((r, g, b))
}

fn read_i32_be<R: Read>(reader: &mut R) -> Result<i32, std::io::Error> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}
