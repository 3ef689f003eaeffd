//! Thin wrapper over the `image` crate: the out-of-scope "JPEG codec and
//! resize kernel" collaborator named in spec.md §1/§6, bound to a concrete
//! crate so the rest of this crate never names `image` types directly.

use crate::error::{ImgFsError, Result};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Decodes a JPEG buffer into an in-memory image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).map_err(ImgFsError::from)
}

/// Produces a resized copy that fits within `width` x `height`, preserving
/// aspect ratio (spec.md §4.2.4 step 3).
pub fn thumbnail(image: &DynamicImage, width: u16, height: u16) -> DynamicImage {
    image.thumbnail(width as u32, height as u32)
}

/// Encodes an in-memory image back to a JPEG byte buffer.
pub fn encode(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(ImgFsError::from)?;
    Ok(buf)
}

/// Reads the width/height of a JPEG buffer without fully decoding its pixel
/// data where the underlying format allows it.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = image::ImageReader::with_format(Cursor::new(bytes), ImageFormat::Jpeg);
    reader.into_dimensions().map_err(ImgFsError::from)
}
