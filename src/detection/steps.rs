use crate::detection::{preprocessing, reader, region};
use crate::error::Result;
use crate::models::{BarcodeCandidate, BoundingBox, Symbology};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use image::DynamicImage;

pub const PAYLOAD_KEY: &str = "payload";
pub const SYMBOLOGY_KEY: &str = "symbology";

/// Quiet zone added around a linear symbol, as a fraction of its width
const LINEAR_QUIET_ZONE_DIVISOR: u32 = 6;
/// Margin added around finder centres of a matrix symbol, as a fraction of their span
const MATRIX_MARGIN_DIVISOR: u32 = 3;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply the fixed 5x5 Gaussian blur
pub struct BlurStep;

impl PipelineStep for BlurStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let blurred = preprocessing::gaussian_blur_5x5(&item.image.to_luma8());
                item.with_image(DynamicImage::ImageLuma8(blurred))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Binarize at the Otsu level
pub struct OtsuThresholdStep;

impl PipelineStep for OtsuThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let (level, binary) = preprocessing::otsu_binarize(&item.image.to_luma8());
                item.with_image(DynamicImage::ImageLuma8(binary))
                    .with_metadata("otsu_level", MetadataValue::Int(level as i32))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Otsu Threshold"
    }
}

/// Hand the binary image to the reader - splits one image into one item per
/// located symbol, each cropped from the original.
pub struct SymbolDetectionStep;

impl PipelineStep for SymbolDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let candidates = reader::read_symbols(&item.image.to_luma8());
            log::info!("Detected {} barcode candidate(s)", candidates.len());

            for candidate in candidates {
                let cropped = match region::extract_region(&item.original, &candidate.rect) {
                    Ok(cropped) => cropped,
                    Err(e) => {
                        log::warn!("Skipping candidate: {}", e);
                        continue;
                    }
                };
                let mut region_data =
                    PipelineData::from_region(cropped, item.original.clone(), candidate.rect);
                region_data.metadata.extend(item.metadata.clone());
                result.push(annotate(region_data, &candidate));
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Symbol Detection"
    }
}

/// Re-read each detected region on its own: pad the rectangle, cut it from
/// the original, preprocess the crop and decode it in isolation. A payload
/// read from the crop replaces the full-frame one.
pub struct RegionDecodeStep {
    pub padding: u32,
}

impl RegionDecodeStep {
    /// The reader reports linear symbols as one scan row between the guard
    /// centres and matrix symbols by their finder centres, so both need the
    /// rest of the symbol and its quiet zone added back.
    fn crop_rect(&self, bbox: &BoundingBox, symbology: Option<Symbology>) -> BoundingBox {
        match symbology {
            Some(sym) if sym.is_linear() => {
                bbox.padded_xy(self.padding.max(bbox.width / LINEAR_QUIET_ZONE_DIVISOR), self.padding)
            }
            Some(_) => bbox.padded(self.padding + bbox.width.max(bbox.height) / MATRIX_MARGIN_DIVISOR),
            None => bbox.padded(self.padding),
        }
    }
}

impl PipelineStep for RegionDecodeStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());

        for item in data {
            let Some(bbox) = item.bbox else {
                result.push(item);
                continue;
            };

            let symbology = item
                .get_string(SYMBOLOGY_KEY)
                .and_then(|name| name.parse::<Symbology>().ok());
            let padded = self.crop_rect(&bbox, symbology);
            let crop = region::extract_region(&item.original, &padded)?;
            let binary = preprocessing::preprocess(&crop);

            let decoded = reader::read_symbols(&binary)
                .into_iter()
                .find(BarcodeCandidate::is_decoded);

            match decoded {
                Some(candidate) => {
                    log::debug!("Region at ({}, {}) decoded from crop", bbox.x, bbox.y);
                    let updated = item.with_image(DynamicImage::ImageLuma8(binary));
                    result.push(annotate(updated, &candidate));
                }
                None => {
                    log::debug!("Region at ({}, {}) did not decode from crop", bbox.x, bbox.y);
                    result.push(item.with_image(DynamicImage::ImageLuma8(binary)));
                }
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Region Decode"
    }
}

fn annotate(item: PipelineData, candidate: &BarcodeCandidate) -> PipelineData {
    match (&candidate.payload, candidate.symbology) {
        (Some(payload), Some(symbology)) => item
            .with_metadata(PAYLOAD_KEY, MetadataValue::Bytes(payload.clone()))
            .with_metadata(SYMBOLOGY_KEY, MetadataValue::String(symbology.to_string())),
        _ => item,
    }
}

/// Rebuild the candidate an item describes, if it carries a region
pub fn candidate_from(item: &PipelineData) -> Option<BarcodeCandidate> {
    let rect = item.bbox?;
    let symbology = item
        .get_string(SYMBOLOGY_KEY)
        .and_then(|name| name.parse::<Symbology>().ok());
    let payload = item.get_bytes(PAYLOAD_KEY).map(<[u8]>::to_vec);

    Some(BarcodeCandidate {
        rect,
        payload: symbology.and(payload),
        symbology,
    })
}
