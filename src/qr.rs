//! Verification QR codes.

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};

use crate::{AppError, Result};

/// Quiet zone around the symbol, in modules.
const QUIET_ZONE: u32 = 1;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// URL a verification QR code points at.
#[must_use]
pub fn verification_url(host: &str, worker_id: &str) -> String {
    format!("https://{host}/api/workers/{worker_id}/pdf")
}

/// Encode `text` as a square grayscale QR raster at least `pixel_size`
/// pixels wide.
///
/// Modules are scaled by a whole factor so every module stays crisp; the
/// result is therefore rounded up to the next multiple of the module count.
///
/// # Errors
///
/// Returns `AppError::Render` if the text does not fit in a QR symbol.
pub fn encode(text: &str, pixel_size: u32) -> Result<GrayImage> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|err| AppError::Render(format!("qr encode failed: {err}")))?;

    let modules = u32::try_from(code.width())
        .map_err(|_| AppError::Render("qr symbol too large".into()))?;
    let colors = code.to_colors();

    let total = modules + 2 * QUIET_ZONE;
    let scale = pixel_size.div_ceil(total).max(1);
    let side = total * scale;

    let mut img = GrayImage::from_pixel(side, side, LIGHT);
    for (index, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let index = u32::try_from(index).map_err(|_| AppError::Render("qr symbol too large".into()))?;
        let mx = index % modules + QUIET_ZONE;
        let my = index / modules + QUIET_ZONE;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(mx * scale + dx, my * scale + dy, DARK);
            }
        }
    }

    Ok(img)
}
