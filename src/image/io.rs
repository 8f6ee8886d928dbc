//! Decoding adapters backed by the `image` crate (feature `image-io`).
//!
//! Decoders only produce raw rasters; luminance reduction happens in
//! [`GrayImage`](crate::GrayImage) so every input format funnels through
//! the same BT.601 conversion.

use std::path::Path;

use crate::image::GrayImage;
use crate::util::{PixMatchError, PixMatchResult};

/// Converts a decoded image into the engine's grayscale raster.
pub fn from_dynamic(img: &image::DynamicImage) -> PixMatchResult<GrayImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    match img {
        image::DynamicImage::ImageLuma8(gray) => {
            GrayImage::from_raw(gray.as_raw().clone(), width, height)
        }
        other => {
            let rgb = other.to_rgb8();
            GrayImage::from_rgb8(rgb.as_raw(), width, height)
        }
    }
}

/// Decodes an encoded byte buffer (PNG, JPEG, BMP, GIF, TIFF, WebP).
pub fn decode_gray(bytes: &[u8]) -> PixMatchResult<GrayImage> {
    let img = image::load_from_memory(bytes).map_err(|err| PixMatchError::Decode {
        reason: err.to_string(),
    })?;
    from_dynamic(&img)
}

/// Loads and decodes an image file.
pub fn load_gray<P: AsRef<Path>>(path: P) -> PixMatchResult<GrayImage> {
    let img = image::open(path).map_err(|err| PixMatchError::Decode {
        reason: err.to_string(),
    })?;
    from_dynamic(&img)
}

/// Reads the dimensions of an encoded image without keeping its pixels.
pub fn image_dims(bytes: &[u8]) -> PixMatchResult<(u32, u32)> {
    let img = image::load_from_memory(bytes).map_err(|err| PixMatchError::Decode {
        reason: err.to_string(),
    })?;
    Ok((img.width(), img.height()))
}
