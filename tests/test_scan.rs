mod common;

use common::*;
use image::DynamicImage;

#[test]
fn known_symbol_decodes_to_its_payload() -> anyhow::Result<()> {
    let file = save_temp_png(&DynamicImage::ImageLuma8(render_qr(TEST_PAYLOAD)));

    let result = BarcodeScanner::new().scan_path(file.path())?;

    assert_eq!(result.data.as_deref(), Some(TEST_PAYLOAD));
    assert_eq!(result.symbology, Some(Symbology::QrCode));
    Ok(())
}

#[test]
fn symbol_on_color_canvas_decodes() -> anyhow::Result<()> {
    let img = qr_on_canvas("HELLO 123", 640, 480, 150, 90);

    let result = BarcodeScanner::new().scan_image(&img)?;

    assert_eq!(result.data.as_deref(), Some("HELLO 123"));
    Ok(())
}

#[test]
fn blank_page_is_not_found() -> anyhow::Result<()> {
    let file = save_temp_png(&blank_page(320, 240));

    let result = BarcodeScanner::new().scan_path(file.path())?;

    assert_eq!(result, ScanResult::not_found());
    assert_eq!(result.data, None);
    assert_eq!(result.symbology, None);
    Ok(())
}

#[test]
fn detected_rectangle_covers_the_symbol() {
    let img = qr_on_canvas(TEST_PAYLOAD, 600, 600, 120, 140);
    let scanner = BarcodeScanner::new();
    let binary = scanner.preprocess_image(&img);

    let candidates = scanner.detect(&binary);

    assert_eq!(candidates.len(), 1);
    let rect = candidates[0].rect;
    let qr_size = render_qr(TEST_PAYLOAD).width();
    let (cx, cy) = (120 + qr_size / 2, 140 + qr_size / 2);
    assert!(rect.x <= cx && cx < rect.x + rect.width);
    assert!(rect.y <= cy && cy < rect.y + rect.height);
    assert!(rect.x + rect.width <= 600 && rect.y + rect.height <= 600);
}

#[test]
fn decode_on_binary_image_matches_scan() {
    let img = qr_on_canvas("decode me", 400, 400, 40, 40);
    let scanner = BarcodeScanner::new();
    let binary = scanner.preprocess_image(&img);

    let decoded = scanner.decode(&binary);

    assert_eq!(decoded.data.as_deref(), Some("decode me"));
    assert_eq!(decoded.symbology, Some(Symbology::QrCode));
}

#[test]
fn crop_mode_decodes_from_region() -> anyhow::Result<()> {
    let img = qr_on_canvas(TEST_PAYLOAD, 700, 500, 300, 60);
    let scanner = BarcodeScanner::new()
        .with_crop_regions(true)
        .with_region_padding(24);

    let result = scanner.scan_image(&img)?;

    assert_eq!(result.data.as_deref(), Some(TEST_PAYLOAD));
    Ok(())
}

#[test]
fn preprocess_path_keeps_dimensions_and_binarizes() -> anyhow::Result<()> {
    let file = save_temp_png(&qr_on_canvas("dims", 300, 200, 10, 10));

    let binary = BarcodeScanner::new().preprocess_path(file.path())?;

    assert_eq!(binary.dimensions(), (300, 200));
    assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    Ok(())
}

#[test]
fn non_image_file_is_image_open_error() {
    let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    std::fs::write(file.path(), b"definitely not a png").unwrap();

    let err = BarcodeScanner::new().scan_path(file.path()).unwrap_err();

    match err {
        ScanError::ImageOpen { path, .. } => assert_eq!(path, file.path()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn debug_out_saves_every_stage() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("preview");
    let config = ScanConfig {
        crop_regions: true,
        debug_out: Some(out.clone()),
        ..ScanConfig::default()
    };

    let result = BarcodeScanner::new()
        .with_config(config)
        .scan_image(&qr_on_canvas("stages", 400, 300, 50, 20))?;

    assert!(result.is_found());
    for stage in [
        "00_input",
        "01_grayscale_conversion",
        "02_gaussian_blur",
        "03_otsu_threshold",
        "04_symbol_detection",
        "05_region_decode",
    ] {
        assert!(out.join(stage).join("01.png").exists(), "missing {stage}");
    }
    Ok(())
}

#[test]
fn ean13_decodes_with_check_digit() -> anyhow::Result<()> {
    let file = save_temp_png(&DynamicImage::ImageLuma8(render_ean13(TEST_EAN_BODY, 4, 200)));

    let result = BarcodeScanner::new().scan_path(file.path())?;

    assert_eq!(result.data.as_deref(), Some("4006381333931"));
    assert_eq!(result.symbology, Some(Symbology::Ean13));
    Ok(())
}

#[test]
fn ean13_decodes_in_crop_mode() -> anyhow::Result<()> {
    let img = DynamicImage::ImageLuma8(render_ean13(TEST_EAN_BODY, 4, 200));
    let scanner = BarcodeScanner::new().with_crop_regions(true);

    let result = scanner.scan_image(&img)?;

    assert_eq!(result.data.as_deref(), Some("4006381333931"));
    assert_eq!(result.symbology, Some(Symbology::Ean13));
    Ok(())
}

#[test]
fn invalid_utf8_payload_is_replaced_not_rejected() -> anyhow::Result<()> {
    let img = DynamicImage::ImageLuma8(render_qr_bytes(&[0x41, 0xff, 0xfe, 0x42]));

    let result = BarcodeScanner::new().scan_image(&img)?;

    assert_eq!(result.data.as_deref(), Some("A\u{FFFD}\u{FFFD}B"));
    assert_eq!(result.symbology, Some(Symbology::QrCode));
    Ok(())
}
