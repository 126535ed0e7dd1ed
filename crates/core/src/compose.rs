//! Character-onto-background image composition.
//!
//! The one piece of pixel-level work in the system: decode both generated
//! images, shrink the character to fit the background, and paste it at a
//! fixed bottom-center anchor. Everything here is deterministic: the same
//! input pair always produces the same composite bytes.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// The character is scaled to occupy this fraction of the background height.
/// Expressed as a ratio to keep the arithmetic integral and deterministic.
pub const CHARACTER_HEIGHT_NUM: u32 = 3;
/// Denominator of the character height fraction.
pub const CHARACTER_HEIGHT_DEN: u32 = 4;

/// Which input image a decode failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Character,
    Background,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Character => write!(f, "character"),
            ImageRole::Background => write!(f, "background"),
        }
    }
}

/// Errors raised while compositing the final scene image.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// One of the inputs is not a decodable image.
    #[error("{role} image is not a decodable image: {source}")]
    Decode {
        role: ImageRole,
        source: image::ImageError,
    },

    /// The composite could not be encoded to PNG.
    #[error("Failed to encode composite image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Overlay `character` onto `background` and return the composite as PNG.
///
/// The character is resized (aspect ratio preserved, Lanczos3) to fit within
/// the background width and [`CHARACTER_HEIGHT_NUM`]/[`CHARACTER_HEIGHT_DEN`]
/// of the background height, then pasted bottom-center. Fails with
/// [`ComposeError::Decode`] if either input cannot be decoded.
pub fn compose(character: &[u8], background: &[u8]) -> Result<Vec<u8>, ComposeError> {
    let character = decode(character, ImageRole::Character)?;
    let mut background = decode(background, ImageRole::Background)?;

    let (bg_w, bg_h) = (background.width(), background.height());
    let target_h = (bg_h * CHARACTER_HEIGHT_NUM / CHARACTER_HEIGHT_DEN).max(1);

    // `resize` fits within the bounding box while preserving aspect ratio.
    let character = character.resize(bg_w, target_h, FilterType::Lanczos3);

    let x = i64::from((bg_w - character.width()) / 2);
    let y = i64::from(bg_h - character.height());
    image::imageops::overlay(&mut background, &character, x, y);

    encode_png(&background)
}

fn decode(bytes: &[u8], role: ImageRole) -> Result<DynamicImage, ComposeError> {
    image::load_from_memory(bytes).map_err(|source| ComposeError::Decode { role, source })
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ComposeError> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(ComposeError::Encode)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Build a solid-color PNG of the given dimensions.
    fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn composite_keeps_background_dimensions() {
        let character = solid_png(80, 100, RED);
        let background = solid_png(200, 160, BLUE);

        let out = compose(&character, &background).unwrap();
        let img = image::load_from_memory(&out).unwrap();

        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 160);
    }

    #[test]
    fn character_is_anchored_bottom_center() {
        let character = solid_png(80, 100, RED);
        let background = solid_png(200, 160, BLUE);

        let out = compose(&character, &background).unwrap();
        let img = image::load_from_memory(&out).unwrap().to_rgba8();

        // Bottom-center pixel is character-colored, top-left stays background.
        let bottom_center = img.get_pixel(100, 159);
        let top_left = img.get_pixel(0, 0);
        assert_eq!(bottom_center.0, RED);
        assert_eq!(top_left.0, BLUE);
    }

    #[test]
    fn character_is_scaled_to_height_fraction() {
        // Character taller than the allowed fraction must be shrunk: the top
        // quarter of the background stays untouched.
        let character = solid_png(100, 400, RED);
        let background = solid_png(200, 160, BLUE);

        let out = compose(&character, &background).unwrap();
        let img = image::load_from_memory(&out).unwrap().to_rgba8();

        // target height = 160 * 3/4 = 120, so rows 0..39 are pure background.
        let above_character = img.get_pixel(100, 20);
        assert_eq!(above_character.0, BLUE);
    }

    #[test]
    fn composite_is_deterministic() {
        let character = solid_png(80, 100, RED);
        let background = solid_png(200, 160, BLUE);

        let first = compose(&character, &background).unwrap();
        let second = compose(&character, &background).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn undecodable_character_fails_with_decode_error() {
        let background = solid_png(200, 160, BLUE);

        let err = compose(b"not an image", &background).unwrap_err();
        match err {
            ComposeError::Decode { role, .. } => assert_eq!(role, ImageRole::Character),
            other => panic!("expected decode error, got {other}"),
        }
    }

    #[test]
    fn undecodable_background_fails_with_decode_error() {
        let character = solid_png(80, 100, RED);

        let err = compose(&character, b"garbage").unwrap_err();
        match err {
            ComposeError::Decode { role, .. } => assert_eq!(role, ImageRole::Background),
            other => panic!("expected decode error, got {other}"),
        }
    }

    #[test]
    fn oversized_character_never_exceeds_background_width() {
        let character = solid_png(1000, 100, RED);
        let background = solid_png(200, 160, BLUE);

        // Must not panic on the overlay bounds; left/right edges remain blue
        // only if the resize capped the width.
        let out = compose(&character, &background).unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!(img.width(), 200);
    }
}
