// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chamber ensemble voicing.
//!
//! This module provides:
//! - The eight fixed instrument roles of the ensemble
//! - Per-measure voicing assignments
//! - The voicing engine that extends chords and assigns parts

pub mod engine;

pub use engine::{extend_pitches, voice, voice_progression, VoicedProgression, VOICE_COUNT};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::music::Pitch;

/// Instrument roles, listed top to bottom of the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Flute,
    Piano,
    Violin1,
    Violin2,
    Viola1,
    Viola2,
    Cello,
    Bass,
}

impl Instrument {
    pub const ALL: [Instrument; 8] = [
        Instrument::Flute,
        Instrument::Piano,
        Instrument::Violin1,
        Instrument::Violin2,
        Instrument::Viola1,
        Instrument::Viola2,
        Instrument::Cello,
        Instrument::Bass,
    ];

    /// Slot key used in serialized voicings
    pub fn key(self) -> &'static str {
        match self {
            Instrument::Flute => "flute",
            Instrument::Piano => "piano",
            Instrument::Violin1 => "violin1",
            Instrument::Violin2 => "violin2",
            Instrument::Viola1 => "viola1",
            Instrument::Viola2 => "viola2",
            Instrument::Cello => "cello",
            Instrument::Bass => "bass",
        }
    }

    /// Name printed on scores
    pub fn display_name(self) -> &'static str {
        match self {
            Instrument::Flute => "Flute",
            Instrument::Piano => "Piano",
            Instrument::Violin1 => "Violin I",
            Instrument::Violin2 => "Violin II",
            Instrument::Viola1 => "Viola I",
            Instrument::Viola2 => "Viola II",
            Instrument::Cello => "Cello",
            Instrument::Bass => "Bass",
        }
    }

    /// General MIDI program number
    pub fn midi_program(self) -> u8 {
        match self {
            Instrument::Flute => 73,
            Instrument::Piano => 0,
            Instrument::Violin1 | Instrument::Violin2 => 40,
            Instrument::Viola1 | Instrument::Viola2 => 41,
            Instrument::Cello => 42,
            Instrument::Bass => 43,
        }
    }

    /// Mix level within the ensemble (0.0 - 1.0)
    pub fn balance(self) -> f64 {
        match self {
            Instrument::Flute => 0.8,
            Instrument::Piano => 0.9,
            Instrument::Violin1 => 0.85,
            Instrument::Violin2 => 0.8,
            Instrument::Viola1 | Instrument::Viola2 => 0.75,
            Instrument::Cello => 0.8,
            Instrument::Bass => 0.9,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One pitch (or nothing) per instrument for a single measure.
///
/// Empty slots serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoicingAssignment {
    #[serde(default)]
    pub flute: Option<Pitch>,
    #[serde(default)]
    pub piano: Option<Pitch>,
    #[serde(default)]
    pub violin1: Option<Pitch>,
    #[serde(default)]
    pub violin2: Option<Pitch>,
    #[serde(default)]
    pub viola1: Option<Pitch>,
    #[serde(default)]
    pub viola2: Option<Pitch>,
    #[serde(default)]
    pub cello: Option<Pitch>,
    #[serde(default)]
    pub bass: Option<Pitch>,
}

impl VoicingAssignment {
    /// Pitch assigned to an instrument
    pub fn get(&self, instrument: Instrument) -> Option<Pitch> {
        match instrument {
            Instrument::Flute => self.flute,
            Instrument::Piano => self.piano,
            Instrument::Violin1 => self.violin1,
            Instrument::Violin2 => self.violin2,
            Instrument::Viola1 => self.viola1,
            Instrument::Viola2 => self.viola2,
            Instrument::Cello => self.cello,
            Instrument::Bass => self.bass,
        }
    }

    /// All slots in score order
    pub fn iter(&self) -> impl Iterator<Item = (Instrument, Option<Pitch>)> + '_ {
        Instrument::ALL.into_iter().map(move |i| (i, self.get(i)))
    }

    /// True when no instrument has a pitch
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, p)| p.is_none())
    }

    /// True when every instrument has a pitch
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, p)| p.is_some())
    }
}

/// Fixed description of the ensemble texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orchestration {
    pub texture: String,
    pub density: String,
    pub balance: BTreeMap<Instrument, f64>,
}

impl Orchestration {
    /// The chamber ensemble every voicing is written for
    pub fn chamber_ensemble() -> Self {
        Self {
            texture: "chamber_ensemble".to_string(),
            density: "medium".to_string(),
            balance: Instrument::ALL.iter().map(|&i| (i, i.balance())).collect(),
        }
    }
}

impl Default for Orchestration {
    fn default() -> Self {
        Self::chamber_ensemble()
    }
}
