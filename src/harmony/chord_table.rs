// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Static chord vocabulary and progression templates.
//!
//! The table maps chord symbols to ordered pitch sets (root first, extensions
//! last) and harmonic areas to roman numeral templates. It is built once and
//! shared read-only.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{HarmonicArea, Style};
use crate::error::Result;
use crate::music::{Pitch, PitchName};

/// A roman numeral progression, one slot per measure before tiling
pub type Template = &'static [&'static str];

/// Used whenever the (style, area) pool is unknown
pub const DEFAULT_TEMPLATE: Template = &["Imaj7", "vi-7", "ii-7", "V7"];

/// Shape every chord's pitch set is derived from
pub const BASE_SYMBOL: &str = "Cmaj7";

const VOICINGS: &[(&str, &[&str])] = &[
    // Major
    ("Cmaj7", &["C3", "E4", "G4", "B4"]),
    ("Cmaj9", &["C3", "E4", "G4", "B4", "D5"]),
    ("Cadd9", &["C3", "E4", "G4", "D5"]),
    ("Cmaj7(11+)", &["C3", "E4", "F#4", "B4"]),
    ("C6/9", &["C3", "E4", "A4", "D5"]),
    ("Csus2", &["C3", "D4", "G4"]),
    ("Csus4", &["C3", "F4", "G4"]),
    // Minor
    ("Cmin7", &["C3", "Eb4", "G4", "Bb4"]),
    ("Cmin9", &["C3", "Eb4", "G4", "Bb4", "D5"]),
    ("Cmin(7+)", &["C3", "Eb4", "G4", "B4"]),
    ("Cmin6", &["C3", "Eb4", "G4", "A4"]),
    ("Cmin(add9)", &["C3", "Eb4", "G4", "D5"]),
    ("Cmin7(b5)", &["C3", "Eb4", "Gb4", "Bb4"]),
    // Dominant
    ("C7", &["C3", "E4", "G4", "Bb4"]),
    ("C9", &["C3", "E4", "G4", "Bb4", "D5"]),
    ("C13", &["C3", "E4", "G4", "Bb4", "A5"]),
    ("C7(9+5+)", &["C3", "E4", "G#4", "Bb4", "D#5"]),
    ("C7(b5)", &["C3", "E4", "Gb4", "Bb4"]),
    ("C13(b9)", &["C3", "E4", "G4", "Bb4", "Db5", "A5"]),
    ("C7sus4", &["C3", "F4", "G4", "Bb4"]),
    ("C7(ALT)", &["C3", "E4", "Gb4", "Bb4", "Db5"]),
    // Diminished
    ("Cdim7", &["C3", "Eb4", "Gb4", "A4"]),
    ("Cdim(add9)", &["C3", "Eb4", "Gb4", "D5"]),
];

/// Extension vocabulary grouped by chord family
pub const FAMILIES: &[(&str, &[&str])] = &[
    (
        "major_extensions",
        &["add9", "maj7", "maj9", "maj7(11+)", "6/9", "sus2", "sus4"],
    ),
    (
        "minor_extensions",
        &["min9", "min7", "min(7+)", "min6", "min(add9)", "min7(b5)"],
    ),
    (
        "dominant_extensions",
        &["7", "9", "13", "7(9+5+)", "7(b5)", "13(b9)", "7sus4", "7(ALT)"],
    ),
    ("diminished", &["dim7", "min7(b5)", "dim(add9)"]),
];

const JAZZ_POP_TONIC: &[Template] = &[
    &["Imaj7", "vi-7", "ii-7", "V7"],
    &["Imaj9", "IV6/9", "ii-7", "V13"],
    &["I6/9", "vi-9", "IV7(11+)", "V7sus4"],
    &["Imaj7", "iii-7", "vi-7", "ii-7"],
];

const BOSSA_NOVA_TONIC: &[Template] = &[
    &["Imaj7", "ii-7", "V7", "Imaj7"],
    &["I6/9", "vi-7", "ii-7", "V7(ALT)"],
    &["Imaj9", "IV7(11+)", "iii-7", "vi-7"],
];

const SUBDOMINANT: &[Template] = &[
    &["IV7(11+)", "ii-7", "V7", "Imaj7"],
    &["IVmaj7", "V7/vi", "vi-7", "ii-7"],
    &["IV6/9", "iv-6", "Imaj7", "V7"],
];

const BRIDGE: &[Template] = &[
    &["iii-7", "VI7", "ii-7", "V7"],
    &["vi-7", "ii-7", "V7", "Imaj7"],
    &["IV7(11+)", "V7/V", "V7", "Imaj7"],
    &["ii-7", "V7/vi", "vi-7", "V7/V"],
];

const DEFAULT_POOL: &[Template] = &[DEFAULT_TEMPLATE];

/// Chord symbol to pitch set lookup
#[derive(Debug, Clone)]
pub struct ChordTable {
    voicings: HashMap<&'static str, Vec<Pitch>>,
}

impl ChordTable {
    /// The built-in table, loaded on first use
    pub fn global() -> &'static ChordTable {
        static TABLE: OnceLock<ChordTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            ChordTable::from_entries(VOICINGS).expect("built-in chord voicings must parse")
        })
    }

    /// Build a table from symbol and note-name pairs, rejecting any bad note
    pub fn from_entries(entries: &[(&'static str, &[&str])]) -> Result<Self> {
        let voicings = entries
            .iter()
            .map(|(symbol, notes)| {
                let pitches = notes.iter().map(|n| Pitch::parse(n)).collect::<Result<Vec<_>>>()?;
                Ok((*symbol, pitches))
            })
            .collect::<Result<_>>()?;
        Ok(Self { voicings })
    }

    /// Exact table entry for a symbol
    pub fn get(&self, symbol: &str) -> Option<&[Pitch]> {
        self.voicings.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.voicings.contains_key(symbol)
    }

    /// All symbols in the table, sorted
    pub fn symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<_> = self.voicings.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.voicings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voicings.is_empty()
    }

    /// Pitch set for any symbol.
    ///
    /// Every symbol, including those in the table, takes the `Cmaj7` shape
    /// with each note renamed to the symbol's root and its octave kept. The
    /// interval between the roots is not applied, so the set repeats the
    /// root name across registers (`Cmaj7` gives C3 C4 C4 C4). Symbols
    /// without a readable root get the `Cmaj7` shape unchanged.
    pub fn pitches(&self, symbol: &str) -> Vec<Pitch> {
        let base = self.get(BASE_SYMBOL).unwrap_or_default();
        match PitchName::leading(symbol) {
            Some(root) => base.iter().map(|p| p.with_name(root)).collect(),
            None => base.to_vec(),
        }
    }

    /// Template pool for a style and harmonic area.
    ///
    /// Only the tonic area varies by style; unknown combinations get the
    /// single default template.
    pub fn templates(style: Option<Style>, area: HarmonicArea) -> &'static [Template] {
        match (area, style) {
            (HarmonicArea::Tonic, Some(Style::JazzPop)) => JAZZ_POP_TONIC,
            (HarmonicArea::Tonic, Some(Style::BossaNova)) => BOSSA_NOVA_TONIC,
            (HarmonicArea::Subdominant, _) => SUBDOMINANT,
            (HarmonicArea::Bridge, _) => BRIDGE,
            _ => DEFAULT_POOL,
        }
    }
}
