use image::GrayImage;
use rxing::{BarcodeFormat, RXingResult, RXingResultMetadataType, RXingResultMetadataValue};

use crate::models::{BarcodeCandidate, BoundingBox, Symbology};

/// Map the reader's format onto the labels this crate reports
pub fn symbology_of(format: &BarcodeFormat) -> Option<Symbology> {
    match format {
        BarcodeFormat::EAN_8 => Some(Symbology::Ean8),
        BarcodeFormat::EAN_13 => Some(Symbology::Ean13),
        BarcodeFormat::UPC_A => Some(Symbology::UpcA),
        BarcodeFormat::UPC_E => Some(Symbology::UpcE),
        BarcodeFormat::CODE_39 => Some(Symbology::Code39),
        BarcodeFormat::CODE_93 => Some(Symbology::Code93),
        BarcodeFormat::CODE_128 => Some(Symbology::Code128),
        BarcodeFormat::CODABAR => Some(Symbology::Codabar),
        BarcodeFormat::ITF => Some(Symbology::Interleaved2of5),
        BarcodeFormat::RSS_14 => Some(Symbology::Databar),
        BarcodeFormat::RSS_EXPANDED => Some(Symbology::DatabarExpanded),
        BarcodeFormat::QR_CODE => Some(Symbology::QrCode),
        BarcodeFormat::DATA_MATRIX => Some(Symbology::DataMatrix),
        BarcodeFormat::PDF_417 => Some(Symbology::Pdf417),
        BarcodeFormat::AZTEC => Some(Symbology::Aztec),
        _ => None,
    }
}

/// Raw payload bytes. Byte-mode segments are kept verbatim so that binary
/// payloads survive; other results fall back to the decoded text.
fn payload_of(result: &RXingResult) -> Vec<u8> {
    match result
        .getRXingResultMetadata()
        .get(&RXingResultMetadataType::BYTE_SEGMENTS)
    {
        Some(RXingResultMetadataValue::ByteSegments(segments)) if !segments.is_empty() => {
            segments.concat()
        }
        _ => result.getText().as_bytes().to_vec(),
    }
}

fn candidate_of(result: &RXingResult) -> Option<BarcodeCandidate> {
    let corners: Vec<(i32, i32)> = result
        .getPoints()
        .iter()
        .map(|p| (p.x.round() as i32, p.y.round() as i32))
        .collect();
    let rect = BoundingBox::from_corners(&corners)?;

    let candidate = match symbology_of(result.getBarcodeFormat()) {
        Some(symbology) => BarcodeCandidate {
            rect,
            payload: Some(payload_of(result)),
            symbology: Some(symbology),
        },
        None => {
            log::debug!(
                "Symbol at ({}, {}) has unreported format {:?}",
                rect.x,
                rect.y,
                result.getBarcodeFormat()
            );
            BarcodeCandidate {
                rect,
                payload: None,
                symbology: None,
            }
        }
    };
    Some(candidate)
}

/// Locate and decode every symbol the reader can find, 1D or 2D.
pub fn read_symbols(img: &GrayImage) -> Vec<BarcodeCandidate> {
    let (width, height) = img.dimensions();
    let results = match rxing::helpers::detect_multiple_in_luma(img.as_raw().clone(), width, height) {
        Ok(results) => results,
        Err(e) => {
            log::debug!("Reader found nothing: {}", e);
            return Vec::new();
        }
    };
    log::debug!("Reader located {} symbol(s)", results.len());

    results.iter().filter_map(candidate_of).collect()
}
