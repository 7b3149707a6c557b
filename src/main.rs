use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use barscan::{BarcodeScanner, ScanConfig, ScanResult};

#[derive(Parser)]
#[command(name = "barscan")]
#[command(about = "Preprocess an image and print the first barcode it contains")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", env = "BARSCAN_IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save each stage's images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Re-decode each detected region from a crop of the original image
    #[arg(long)]
    crop: bool,

    /// Padding in pixels around cropped regions
    #[arg(long, value_name = "PX")]
    padding: Option<u32>,

    /// Load scanner settings from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// File settings first, then command-line overrides
    fn scan_config(&self) -> anyhow::Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ScanConfig::default(),
        };

        if self.crop {
            config.crop_regions = true;
        }
        if let Some(padding) = self.padding {
            config.region_padding = padding;
        }
        if self.debug_out.is_some() {
            config.debug_out = self.debug_out.clone();
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let scanner = BarcodeScanner::new().with_config(args.scan_config()?);
    let result = scanner
        .scan_path(&args.image_path)
        .with_context(|| format!("Failed to scan {}", args.image_path.display()))?;

    println!("{}", render_result(&result, args.json)?);
    Ok(())
}

/// The text printed for a scan, either the two labelled lines or JSON
fn render_result(result: &ScanResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    Ok(match (&result.data, &result.symbology) {
        (Some(data), Some(symbology)) => format!("Barcode Data: {}\nBarcode Type: {}", data, symbology),
        _ => "No barcode detected or decoded.".to_string(),
    })
}
