use super::number::MAX_PRECISION;
use crate::error::ExportError;

/// Options for SVG export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// How many pixels one scene unit represents (default: 10)
    pub scale: u32,
    /// Decimal digits kept for coordinates and angles (default: 4)
    pub precision: u32,
    /// Write the whole document on one line (default: false)
    pub minify: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 10,
            precision: 4,
            minify: false,
        }
    }
}

impl ExportOptions {
    /// Reject values the exporter cannot honour
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.scale == 0 {
            return Err(ExportError::InvalidScale);
        }
        if self.precision > MAX_PRECISION {
            return Err(ExportError::InvalidPrecision {
                value: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }
}
