//! Image byte decoding and encoding.

use image::error::{DecodingError, ImageFormatHint};
use image::{ImageError, ImageFormat, RgbImage};
use std::io::Cursor;

/// Decode `bytes` (PNG, JPEG, GIF, WebP, ... as guessed from the content)
/// into an 8-bit RGB buffer. Alpha is discarded; grayscale is expanded.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Unknown,
            "empty input",
        )));
    }
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Encode an RGB buffer as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
