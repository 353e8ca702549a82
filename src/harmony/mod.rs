// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic progression generation.
//!
//! This module provides:
//! - Chord table: chord symbols, pitch sets and progression templates
//! - Form resolution: named song forms split into sections
//! - Roman numeral resolution into concrete chord symbols
//! - Progression generation and cadence analysis

pub mod cadence;
pub mod chord_table;
pub mod form;
pub mod progression;
pub mod roman;

pub use cadence::{analyze, Cadence, CadenceType};
pub use chord_table::ChordTable;
pub use form::{Form, Section};
pub use progression::{
    Analysis, FirstTemplate, FixedIndex, GenerationRequest, Progression, ProgressionGenerator,
    RandomSelector, TemplateSelector,
};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::music::Pitch;
use crate::voicing::VoicingAssignment;

/// Keys offered to callers
pub const AVAILABLE_KEYS: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Harmonic area of a section, selecting the eligible template pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonicArea {
    Tonic,
    Subdominant,
    Bridge,
}

/// Harmonic function of a single chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonicFunction {
    Tonic,
    Subdominant,
    Dominant,
}

impl HarmonicFunction {
    /// Classify a chord symbol by its quality markers.
    ///
    /// Symbols without a recognizable marker are tonic.
    pub fn of_symbol(symbol: &str) -> Self {
        if symbol.contains("maj7") || symbol.contains("6/9") {
            HarmonicFunction::Tonic
        } else if symbol.contains("min7") {
            HarmonicFunction::Subdominant
        } else if symbol.contains('7') && !symbol.contains("maj") {
            HarmonicFunction::Dominant
        } else {
            HarmonicFunction::Tonic
        }
    }
}

impl fmt::Display for HarmonicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmonicFunction::Tonic => write!(f, "tonic"),
            HarmonicFunction::Subdominant => write!(f, "subdominant"),
            HarmonicFunction::Dominant => write!(f, "dominant"),
        }
    }
}

/// Upper chord extension available for elaboration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tension {
    #[serde(rename = "9")]
    Ninth,
    #[serde(rename = "11")]
    Eleventh,
    #[serde(rename = "13")]
    Thirteenth,
    #[serde(rename = "b5")]
    FlatFive,
    #[serde(rename = "#11")]
    SharpEleven,
}

impl Tension {
    /// Scan a chord symbol for tension markers, in fixed order
    pub fn of_symbol(symbol: &str) -> Vec<Tension> {
        let mut tensions = Vec::new();
        if symbol.contains('9') {
            tensions.push(Tension::Ninth);
        }
        if symbol.contains("11") {
            tensions.push(Tension::Eleventh);
        }
        if symbol.contains("13") {
            tensions.push(Tension::Thirteenth);
        }
        if symbol.contains("b5") {
            tensions.push(Tension::FlatFive);
        }
        if symbol.contains("#11") || symbol.contains("11+") {
            tensions.push(Tension::SharpEleven);
        }
        tensions
    }
}

/// A resolved chord with its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordInfo {
    pub symbol: String,
    pub notes: Vec<Pitch>,
    pub function: HarmonicFunction,
    pub tensions: Vec<Tension>,
}

impl ChordInfo {
    /// Build the chord info for a symbol using the given table
    pub fn from_symbol(symbol: impl Into<String>, table: &ChordTable) -> Self {
        let symbol = symbol.into();
        Self {
            notes: table.pitches(&symbol),
            function: HarmonicFunction::of_symbol(&symbol),
            tensions: Tension::of_symbol(&symbol),
            symbol,
        }
    }
}

/// Dynamics marking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dynamics {
    #[serde(rename = "f")]
    Forte,
    #[default]
    #[serde(rename = "mf")]
    MezzoForte,
}

impl Dynamics {
    /// Bridge sections open forte for their first half
    pub fn for_measure(area: HarmonicArea, offset: u32, section_length: u32) -> Self {
        if area == HarmonicArea::Bridge && offset < section_length / 2 {
            Dynamics::Forte
        } else {
            Dynamics::MezzoForte
        }
    }

    /// MIDI velocity for this marking
    pub fn velocity(self) -> u8 {
        match self {
            Dynamics::Forte => 96,
            Dynamics::MezzoForte => 80,
        }
    }
}

/// Articulation marking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Articulation {
    #[default]
    #[serde(rename = "legato")]
    Legato,
    #[serde(rename = "molto legato")]
    MoltoLegato,
}

impl Articulation {
    pub fn for_style(style: &str) -> Self {
        match Style::from_name(style) {
            Some(Style::EcmStyle) => Articulation::MoltoLegato,
            _ => Articulation::Legato,
        }
    }
}

/// Named arranging styles with their own template pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    JazzPop,
    BossaNova,
    EcmStyle,
    Rubato,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::JazzPop, Style::BossaNova, Style::EcmStyle, Style::Rubato];

    /// Parse a style by its exact display name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Jazz Pop" => Some(Style::JazzPop),
            "Bossa Nova" => Some(Style::BossaNova),
            "ECM Style" => Some(Style::EcmStyle),
            "Rubato" => Some(Style::Rubato),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Style::JazzPop => "Jazz Pop",
            Style::BossaNova => "Bossa Nova",
            Style::EcmStyle => "ECM Style",
            Style::Rubato => "Rubato",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Requested harmonic complexity (carried through, not yet used by generation).
///
/// Names are read case-insensitively and anything unrecognized reads as
/// `Medium`, so a request never fails on this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
    Advanced,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [
        Complexity::Simple,
        Complexity::Medium,
        Complexity::Complex,
        Complexity::Advanced,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Medium => "Medium",
            Complexity::Complex => "Complex",
            Complexity::Advanced => "Advanced",
        }
    }
}

impl<'de> Deserialize<'de> for Complexity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Other(serde::de::IgnoredAny),
        }

        let complexity = match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Complexity::from_name(&name).unwrap_or_else(|| {
                debug!(complexity = %name, "unknown complexity, using Medium");
                Complexity::default()
            }),
            Raw::Other(_) => {
                debug!("complexity is not a name, using Medium");
                Complexity::default()
            }
        };
        Ok(complexity)
    }
}

/// One measure of the generated progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureEntry {
    /// 1-based measure number, contiguous across the whole form
    pub measure: u32,
    pub chord: ChordInfo,
    #[serde(default)]
    pub voicing: VoicingAssignment,
    #[serde(default)]
    pub dynamics: Dynamics,
    #[serde(default)]
    pub articulation: Articulation,
}
