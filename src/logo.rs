use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{BingoError, Result};

/// Width the custom dauber image is scaled to; height keeps the aspect ratio.
pub const LOGO_WIDTH: u32 = 40;
const BADGE_PX: u32 = 40;

/// Loads an image, scales it to dauber size and returns it as a PNG data URI.
pub fn logo_data_uri(path: &Path) -> Result<String> {
    let to_err = |source| BingoError::Logo { path: path.to_path_buf(), source };
    let img = image::open(path).map_err(to_err)?;
    let height = ((img.height() as f32) * LOGO_WIDTH as f32 / img.width().max(1) as f32).round();
    let resized = img.resize_exact(LOGO_WIDTH, (height as u32).max(1), FilterType::Lanczos3);
    encode_png(&resized).map_err(to_err)
}

/// Gold disc with a darker ring, used when the logo dauber has no image.
pub fn default_badge_uri() -> Result<String> {
    let fill = Rgba([255, 192, 0, 255]);
    let ring = Rgba([191, 120, 0, 255]);
    let centre = (BADGE_PX as f32 - 1.0) / 2.0;
    let radius = BADGE_PX as f32 / 2.0;

    let mut img = RgbaImage::from_pixel(BADGE_PX, BADGE_PX, Rgba([0, 0, 0, 0]));
    for (x, y, px) in img.enumerate_pixels_mut() {
        let d = ((x as f32 - centre).powi(2) + (y as f32 - centre).powi(2)).sqrt();
        if d <= radius - 4.0 {
            *px = fill;
        } else if d <= radius {
            *px = ring;
        }
    }
    encode_png(&DynamicImage::ImageRgba8(img)).map_err(BingoError::Badge)
}

fn encode_png(img: &DynamicImage) -> std::result::Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&buf)))
}
