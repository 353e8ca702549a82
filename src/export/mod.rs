// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Score export.
//!
//! This module provides:
//! - The `Composition` handed to exporters
//! - MusicXML, Standard MIDI File and PDF producers
//! - Base64 export results carrying a success flag and error message

pub mod midi;
pub mod musicxml;
pub mod pdf;

pub use midi::{MidiFileFormat, MidiScoreExporter};
pub use musicxml::MusicXmlExporter;
pub use pdf::PdfExporter;

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::harmony::MeasureEntry;

pub const DEFAULT_TITLE: &str = "composition";
pub const DEFAULT_TEMPO: f64 = 120.0;

/// A voiced progression ready for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub style: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    #[serde(default)]
    pub measures: Vec<MeasureEntry>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_key() -> String {
    "C".to_string()
}

fn default_tempo() -> f64 {
    DEFAULT_TEMPO
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            title: default_title(),
            key: default_key(),
            form: String::new(),
            style: String::new(),
            tempo: DEFAULT_TEMPO,
            measures: Vec::new(),
        }
    }
}

impl Composition {
    pub fn new(title: impl Into<String>, key: impl Into<String>, measures: Vec<MeasureEntry>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            measures,
            ..Default::default()
        }
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    MusicXml,
    Midi,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::MusicXml, ExportFormat::Midi, ExportFormat::Pdf];

    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::MusicXml => "musicxml",
            ExportFormat::Midi => "mid",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Parse a format name ("musicxml", "midi", "pdf")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "musicxml" | "xml" => Some(ExportFormat::MusicXml),
            "midi" | "mid" => Some(ExportFormat::Midi),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::MusicXml => "musicxml",
            ExportFormat::Midi => "midi",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Something that can encode a composition into file bytes
pub trait ScoreExporter {
    fn format(&self) -> ExportFormat;

    fn encode(&self, composition: &Composition) -> Result<Vec<u8>>;
}

/// Outcome of an export, as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    pub success: bool,
    /// Base64-encoded file contents (empty on failure)
    pub data: String,
    pub format: ExportFormat,
    /// Suggested file name (empty on failure)
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    /// Decode the payload back into file bytes
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Export(format!("invalid base64 payload: {}", e)))
    }
}

/// Run an exporter, capturing failures in the result
pub fn export(exporter: &dyn ScoreExporter, composition: &Composition) -> ExportResult {
    let format = exporter.format();
    match exporter.encode(composition) {
        Ok(bytes) => {
            debug!(%format, bytes = bytes.len(), title = %composition.title, "exported composition");
            ExportResult {
                success: true,
                data: base64::engine::general_purpose::STANDARD.encode(&bytes),
                format,
                filename: format!("{}.{}", composition.title, format.extension()),
                error: None,
            }
        }
        Err(e) => {
            warn!(%format, error = %e, "export failed");
            ExportResult {
                success: false,
                data: String::new(),
                format,
                filename: String::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Exporter for a format, using the given MIDI settings where relevant
pub fn exporter_for(format: ExportFormat, midi: MidiScoreExporter) -> Box<dyn ScoreExporter> {
    match format {
        ExportFormat::MusicXml => Box::new(MusicXmlExporter),
        ExportFormat::Midi => Box::new(midi),
        ExportFormat::Pdf => Box::new(PdfExporter),
    }
}
