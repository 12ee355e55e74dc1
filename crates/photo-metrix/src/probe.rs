//! Pixel-dimension probing via the `image` crate.

use std::path::Path;

/// Width in pixels of the image at `path`, reading only the header.
pub fn image_width_px(path: impl AsRef<Path>) -> Result<u32, image::ImageError> {
    let (width, _) = image::image_dimensions(path)?;
    Ok(width)
}
