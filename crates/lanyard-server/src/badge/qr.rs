// SPDX-License-Identifier: Apache-2.0

//! Contact QR codes: generated once at contact creation as a base64 PNG data
//! URL, decoded back to raw pixels at badge-print time.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use qrcode::{Color, QrCode};

const MODULE_SCALE: u32 = 4;
const QUIET_ZONE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub width: u32,
    pub height: u32,
    /// 8-bit grayscale, row-major.
    pub pixels: Vec<u8>,
}

fn render_modules(code: &QrCode) -> QrImage {
    let modules = code.width() as u32;
    let side = (modules + 2 * QUIET_ZONE) * MODULE_SCALE;
    let colors = code.to_colors();
    let mut pixels = vec![255u8; (side * side) as usize];
    for (idx, color) in colors.iter().enumerate() {
        if *color == Color::Dark {
            let mx = (idx as u32 % modules + QUIET_ZONE) * MODULE_SCALE;
            let my = (idx as u32 / modules + QUIET_ZONE) * MODULE_SCALE;
            for dy in 0..MODULE_SCALE {
                for dx in 0..MODULE_SCALE {
                    pixels[((my + dy) * side + mx + dx) as usize] = 0;
                }
            }
        }
    }
    QrImage {
        width: side,
        height: side,
        pixels,
    }
}

/// Encodes the payload into a `data:image/png;base64,...` URL.
pub fn generate_data_url(payload: &str) -> Result<String, String> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| format!("qr encoding: {e}"))?;
    let img = render_modules(&code);
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&img.pixels, img.width, img.height, ExtendedColorType::L8)
        .map_err(|e| format!("png encoding: {e}"))?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Decodes a stored data URL (or bare base64 string) back into grayscale
/// pixels for PDF embedding.
pub fn decode_data_url(stored: &str) -> Result<QrImage, String> {
    let b64 = stored
        .split_once("base64,")
        .map_or(stored, |(_, rest)| rest);
    let bytes = BASE64
        .decode(b64.trim())
        .map_err(|e| format!("base64 decode: {e}"))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| format!("image decode: {e}"))?;
    let gray = decoded.to_luma8();
    Ok(QrImage {
        width: gray.width(),
        height: gray.height(),
        pixels: gray.into_raw(),
    })
}
