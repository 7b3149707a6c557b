pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::ScanConfig;
pub use detection::BarcodeScanner;
pub use error::ScanError;
pub use models::{BarcodeCandidate, BoundingBox, ScanResult, Symbology};
pub use pipeline::{DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
