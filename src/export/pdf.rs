// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! PDF score placeholder.
//!
//! Engraving is left to an external tool; this exporter returns a fixed
//! minimal document so callers can exercise the full export path.

use super::{Composition, ExportFormat, ScoreExporter};
use crate::error::Result;

pub const PLACEHOLDER: &[u8] = b"%PDF-1.4\n1 0 obj\n<<\n/Type /Catalog\n/Pages 2 0 R\n>>\nendobj\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl ScoreExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn encode(&self, _composition: &Composition) -> Result<Vec<u8>> {
        Ok(PLACEHOLDER.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_ignores_content() {
        let empty = PdfExporter.encode(&Composition::default()).unwrap();
        let titled = PdfExporter
            .encode(&Composition::new("Other", "F", Vec::new()))
            .unwrap();
        assert_eq!(empty, titled);
        assert!(empty.starts_with(b"%PDF-1.4"));
    }
}
