use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest box enclosing all corner points. Negative coordinates are
    /// pulled in to zero.
    pub fn from_corners(corners: &[(i32, i32)]) -> Option<Self> {
        let min_x = corners.iter().map(|c| c.0).min()?.max(0) as u32;
        let min_y = corners.iter().map(|c| c.1).min()?.max(0) as u32;
        let max_x = corners.iter().map(|c| c.0).max()?.max(0) as u32;
        let max_y = corners.iter().map(|c| c.1).max()?.max(0) as u32;

        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Grow the box by `padding` on every side (saturating at zero on the
    /// top/left edges).
    pub fn padded(&self, padding: u32) -> Self {
        self.padded_xy(padding, padding)
    }

    /// Grow the box by `pad_x` left and right and `pad_y` above and below.
    pub fn padded_xy(&self, pad_x: u32, pad_y: u32) -> Self {
        let x = self.x.saturating_sub(pad_x);
        let y = self.y.saturating_sub(pad_y);
        Self {
            x,
            y,
            width: self.width + (self.x - x) + pad_x,
            height: self.height + (self.y - y) + pad_y,
        }
    }

    /// Intersection with a `width` x `height` image, or `None` when the two
    /// do not overlap.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clamped_w = self.width.min(width - self.x);
        let clamped_h = self.height.min(height - self.y);
        if clamped_w == 0 || clamped_h == 0 {
            return None;
        }
        Some(Self::new(self.x, self.y, clamped_w, clamped_h))
    }
}

/// Barcode encoding standard reported by the reader. Names follow the
/// zbar type labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbology {
    Ean8,
    Ean13,
    UpcA,
    UpcE,
    Code39,
    Code93,
    Code128,
    Codabar,
    Interleaved2of5,
    Databar,
    DatabarExpanded,
    QrCode,
    DataMatrix,
    Pdf417,
    Aztec,
}

impl Symbology {
    pub const ALL: [Symbology; 15] = [
        Symbology::Ean8,
        Symbology::Ean13,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::Codabar,
        Symbology::Interleaved2of5,
        Symbology::Databar,
        Symbology::DatabarExpanded,
        Symbology::QrCode,
        Symbology::DataMatrix,
        Symbology::Pdf417,
        Symbology::Aztec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Ean8 => "EAN8",
            Symbology::Ean13 => "EAN13",
            Symbology::UpcA => "UPCA",
            Symbology::UpcE => "UPCE",
            Symbology::Code39 => "CODE39",
            Symbology::Code93 => "CODE93",
            Symbology::Code128 => "CODE128",
            Symbology::Codabar => "CODABAR",
            Symbology::Interleaved2of5 => "I25",
            Symbology::Databar => "DATABAR",
            Symbology::DatabarExpanded => "DATABAR_EXP",
            Symbology::QrCode => "QRCODE",
            Symbology::DataMatrix => "DATAMATRIX",
            Symbology::Pdf417 => "PDF417",
            Symbology::Aztec => "AZTEC",
        }
    }

    /// One-dimensional (linear) symbologies
    pub fn is_linear(&self) -> bool {
        !matches!(
            self,
            Symbology::QrCode | Symbology::DataMatrix | Symbology::Pdf417 | Symbology::Aztec
        )
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.as_str() == s)
            .ok_or_else(|| format!("unknown symbology: {}", s))
    }
}

impl TryFrom<String> for Symbology {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbology> for String {
    fn from(value: Symbology) -> Self {
        value.as_str().to_string()
    }
}

/// A located symbol, decoded or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeCandidate {
    pub rect: BoundingBox,
    pub payload: Option<Vec<u8>>,
    pub symbology: Option<Symbology>,
}

impl BarcodeCandidate {
    pub fn is_decoded(&self) -> bool {
        self.payload.is_some()
    }

    /// Payload as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> Option<String> {
        let payload = self.payload.as_ref()?;
        match std::str::from_utf8(payload) {
            Ok(text) => Some(text.to_string()),
            Err(e) => {
                log::warn!("Barcode payload is not valid UTF-8 ({}), decoding lossily", e);
                Some(String::from_utf8_lossy(payload).into_owned())
            }
        }
    }
}

/// Outcome of a scan: both fields are present, or both are absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub data: Option<String>,
    #[serde(rename = "type")]
    pub symbology: Option<Symbology>,
}

impl ScanResult {
    pub fn not_found() -> Self {
        Self::default()
    }

    /// First decoded candidate wins; no disambiguation among several symbols.
    pub fn first_decoded(candidates: &[BarcodeCandidate]) -> Self {
        candidates
            .iter()
            .find_map(|c| match (c.text(), c.symbology) {
                (Some(data), Some(symbology)) => Some(Self {
                    data: Some(data),
                    symbology: Some(symbology),
                }),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn is_found(&self) -> bool {
        self.data.is_some()
    }
}
