use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use qrcode::QrCode;
use tempfile::NamedTempFile;

/// Renders `payload` as a QR symbol with a quiet zone, 8px per module.
pub fn render_qr(payload: &str) -> GrayImage {
    render_qr_bytes(payload.as_bytes())
}

/// Same as [`render_qr`] for payloads that are not text.
pub fn render_qr_bytes(payload: &[u8]) -> GrayImage {
    QrCode::new(payload)
        .expect("Failed to encode QR payload")
        .render::<Luma<u8>>()
        .module_dimensions(8, 8)
        .build()
}

/// Places the QR symbol on a larger tinted color canvas at (`x`, `y`).
pub fn qr_on_canvas(payload: &str, width: u32, height: u32, x: u32, y: u32) -> DynamicImage {
    let qr = render_qr(payload);
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([235, 230, 220]));
    for (qx, qy, pixel) in qr.enumerate_pixels() {
        let v = pixel[0];
        canvas.put_pixel(x + qx, y + qy, Rgb([v, v, v]));
    }
    DynamicImage::ImageRgb8(canvas)
}

/// L-code bit patterns per digit; G and R codes are derived from these.
const EAN_L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];

/// L/G parity of the left half, selected by the first digit.
const EAN_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];

/// Appends the check digit to a 12-digit EAN-13 body.
pub fn ean13_with_check(body: &str) -> String {
    let sum: u32 = body
        .chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap() * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    format!("{}{}", body, (10 - sum % 10) % 10)
}

/// Draws an EAN-13 symbol: black bars on white, `module` px per module,
/// 11 modules of quiet zone on each side.
pub fn render_ean13(body: &str, module: u32, bar_height: u32) -> GrayImage {
    let code = ean13_with_check(body);
    let digits: Vec<usize> = code.chars().map(|c| c.to_digit(10).unwrap() as usize).collect();
    let invert = |bits: &str| -> String { bits.chars().map(|b| if b == '0' { '1' } else { '0' }).collect() };

    let mut bits = String::from("101");
    for (i, &d) in digits[1..7].iter().enumerate() {
        let l = EAN_L_CODES[d];
        match EAN_PARITY[digits[0]].as_bytes()[i] {
            b'L' => bits.push_str(l),
            _ => bits.push_str(&invert(l).chars().rev().collect::<String>()),
        }
    }
    bits.push_str("01010");
    for &d in &digits[7..] {
        bits.push_str(&invert(EAN_L_CODES[d]));
    }
    bits.push_str("101");

    let quiet = 11;
    let width = (bits.len() as u32 + 2 * quiet) * module;
    let height = bar_height + 2 * quiet * module;
    let bars = bits.as_bytes();
    GrayImage::from_fn(width, height, |x, y| {
        let m = (x / module) as i64 - quiet as i64;
        let in_rows = y >= quiet * module && y < quiet * module + bar_height;
        let dark = in_rows && m >= 0 && (m as usize) < bars.len() && bars[m as usize] == b'1';
        if dark { Luma([0u8]) } else { Luma([255u8]) }
    })
}

/// Writes the image to a temp PNG that is removed when dropped.
pub fn save_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// A plain white page with no symbol on it
pub fn blank_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255u8])))
}

pub const TEST_PAYLOAD: &str = "https://example.com/item/4006381333931";
pub const TEST_EAN_BODY: &str = "400638133393";
