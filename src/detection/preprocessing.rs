use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;
use imageproc::map::map_colors;

/// 5-tap binomial weights, the kernel OpenCV picks for a 5x5 Gaussian with
/// sigma left at zero.
pub const GAUSSIAN_5X5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Smooth with a fixed 5x5 Gaussian kernel
pub fn gaussian_blur_5x5(img: &GrayImage) -> GrayImage {
    separable_filter_equal(img, &GAUSSIAN_5X5[..])
}

/// Binary threshold at the Otsu level: pixels above the level become white,
/// everything else black. Returns the chosen level alongside the image.
pub fn otsu_binarize(img: &GrayImage) -> (u8, GrayImage) {
    let level = otsu_level(img);
    let binary = map_colors(img, |Luma([v])| {
        if v > level { Luma([255u8]) } else { Luma([0u8]) }
    });
    (level, binary)
}

/// Full preprocessing chain: grayscale, blur, Otsu threshold
pub fn preprocess(img: &DynamicImage) -> GrayImage {
    let gray = to_grayscale(img);
    let blurred = gaussian_blur_5x5(&gray);
    let (level, binary) = otsu_binarize(&blurred);
    log::debug!(
        "Preprocessed {}x{} image (otsu level {})",
        binary.width(),
        binary.height(),
        level
    );
    binary
}
