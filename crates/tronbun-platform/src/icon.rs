//! Tray icon images.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tronbun_common::PlatformError;

/// Side length of the generated default icon.
pub const DEFAULT_ICON_SIZE: u32 = 32;

/// 8-bit RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn into_tray_icon(self) -> Result<tray_icon::Icon, PlatformError> {
        tray_icon::Icon::from_rgba(self.pixels, self.width, self.height)
            .map_err(|e| PlatformError::IconError(e.to_string()))
    }
}

/// Decode a PNG file into RGBA.
pub fn load_png(path: &Path) -> Result<RgbaImage, PlatformError> {
    let file = File::open(path)
        .map_err(|e| PlatformError::IconError(format!("{}: {e}", path.display())))?;
    decode_png(BufReader::new(file))
}

pub fn decode_png<R: Read>(source: R) -> Result<RgbaImage, PlatformError> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| PlatformError::IconError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PlatformError::IconError(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let pixels = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 0xff])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 0xff]).collect(),
        png::ColorType::Indexed => {
            return Err(PlatformError::IconError(
                "indexed PNG was not expanded".into(),
            ));
        }
    };

    Ok(RgbaImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// A filled disc on a transparent background.
pub fn default_icon(size: u32) -> RgbaImage {
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = dx * dx + dy * dy <= radius * radius;
            if inside {
                pixels.extend_from_slice(&[0x3b, 0x82, 0xf6, 0xff]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    RgbaImage {
        width: size,
        height: size,
        pixels,
    }
}

// =============================================================================
// TESTS
// =============================================================================
