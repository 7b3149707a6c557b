pub mod preprocessing;
pub mod reader;
pub mod region;
pub mod steps;

use image::{DynamicImage, GrayImage};
use std::path::Path;
use std::sync::Arc;

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::models::{BarcodeCandidate, ScanResult};
use crate::pipeline::Pipeline;

/// Loads, preprocesses and reads barcodes from images
#[derive(Debug, Clone, Default)]
pub struct BarcodeScanner {
    pub config: ScanConfig,
}

impl BarcodeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_crop_regions(mut self, crop_regions: bool) -> Self {
        self.config.crop_regions = crop_regions;
        self
    }

    pub fn with_region_padding(mut self, padding: u32) -> Self {
        self.config.region_padding = padding;
        self
    }

    /// Read an image from disk
    pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| ScanError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img)
    }

    /// Load an image and return its binary form
    pub fn preprocess_path(&self, path: impl AsRef<Path>) -> Result<GrayImage> {
        let img = Self::load(path)?;
        Ok(self.preprocess_image(&img))
    }

    pub fn preprocess_image(&self, img: &DynamicImage) -> GrayImage {
        preprocessing::preprocess(img)
    }

    /// Every symbol the reader locates, decoded or not
    pub fn detect(&self, binary: &GrayImage) -> Vec<BarcodeCandidate> {
        reader::read_symbols(binary)
    }

    /// First decoded symbol, or a not-found result
    pub fn decode(&self, binary: &GrayImage) -> ScanResult {
        ScanResult::first_decoded(&self.detect(binary))
    }

    /// The standard step chain for the current configuration
    pub fn pipeline(&self) -> Result<Pipeline> {
        let mut pipeline = build_standard_pipeline();

        if self.config.crop_regions {
            pipeline = pipeline.add_step(Arc::new(steps::RegionDecodeStep {
                padding: self.config.region_padding,
            }));
        }

        if let Some(dir) = &self.config.debug_out {
            pipeline = pipeline.with_debug(dir)?;
        }

        Ok(pipeline)
    }

    /// Run the full pipeline on an in-memory image
    pub fn scan_image(&self, img: &DynamicImage) -> Result<ScanResult> {
        let items = self.pipeline()?.run(img.clone())?;
        let candidates: Vec<BarcodeCandidate> = items.iter().filter_map(steps::candidate_from).collect();

        let result = ScanResult::first_decoded(&candidates);
        match &result.data {
            Some(_) => log::info!(
                "Decoded {} of {} candidate(s)",
                candidates.iter().filter(|c| c.is_decoded()).count(),
                candidates.len()
            ),
            None => log::info!("No barcode decoded from {} candidate(s)", candidates.len()),
        }
        Ok(result)
    }

    /// Load an image from disk and scan it
    pub fn scan_path(&self, path: impl AsRef<Path>) -> Result<ScanResult> {
        self.scan_image(&Self::load(path)?)
    }
}

/// Grayscale, blur, threshold, then hand off to the reader
pub fn build_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(steps::GrayscaleStep))
        .add_step(Arc::new(steps::BlurStep))
        .add_step(Arc::new(steps::OtsuThresholdStep))
        .add_step(Arc::new(steps::SymbolDetectionStep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_mode_appends_region_step() {
        let plain = BarcodeScanner::new().pipeline().unwrap();
        assert_eq!(
            plain.step_names(),
            ["Grayscale Conversion", "Gaussian Blur", "Otsu Threshold", "Symbol Detection"]
        );

        let cropping = BarcodeScanner::new().with_crop_regions(true).pipeline().unwrap();
        assert_eq!(cropping.step_names().last(), Some(&"Region Decode"));
    }

    #[test]
    fn missing_file_is_image_open_error() {
        let err = BarcodeScanner::new().scan_path("/nonexistent/code.png").unwrap_err();
        assert!(matches!(err, ScanError::ImageOpen { .. }));
    }
}
