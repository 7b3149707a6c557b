use image::{DynamicImage, GenericImageView};

use crate::error::{Result, ScanError};
use crate::models::BoundingBox;

/// Cut the rectangle out of the image.
///
/// Rectangles hanging over the image edge are clipped to it; a rectangle with
/// no overlap at all is an error rather than an empty image.
pub fn extract_region(img: &DynamicImage, rect: &BoundingBox) -> Result<DynamicImage> {
    let (width, height) = img.dimensions();
    let clipped = rect.clamp_to(width, height).ok_or(ScanError::EmptyRegion {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        image_width: width,
        image_height: height,
    })?;

    if clipped != *rect {
        log::debug!("Clipped region {:?} to {:?}", rect, clipped);
    }

    Ok(img.crop_imm(clipped.x, clipped.y, clipped.width, clipped.height))
}
