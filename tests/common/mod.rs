mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from barscan for tests
pub use barscan::{BarcodeScanner, BoundingBox, ScanConfig, ScanError, ScanResult, Symbology};
