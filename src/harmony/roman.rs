// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Roman numeral slots and their resolution to chord symbols.
//!
//! A slot such as `vi-7` or `IV7(11+)` is split into its numeral (`vi`,
//! `IV`) and a quality suffix. The numeral is mapped through a per-key root
//! table and the first matching suffix is re-attached.

use tracing::debug;

/// Markers that end the numeral part of a slot
const NUMERAL_TERMINATORS: [&str; 7] = ["maj", "7", "-", "6", "9", "sus", "("];

/// Quality markers checked in priority order, with the suffix they produce
const QUALITY_SUFFIXES: [(&str, &str); 7] = [
    ("maj7", "maj7"),
    ("maj9", "maj9"),
    ("-7", "min7"),
    ("-9", "min9"),
    ("7", "7"),
    ("6/9", "6/9"),
    ("add9", "add9"),
];

/// Root used when a numeral is missing from the key table
pub const FALLBACK_ROOT: &str = "C";

type RootMap = [(&'static str, &'static str); 7];

const C_MAJOR: RootMap = [
    ("I", "C"),
    ("ii", "D-"),
    ("iii", "E-"),
    ("IV", "F"),
    ("V", "G"),
    ("vi", "A-"),
    ("vii", "B"),
];

const EB_MAJOR: RootMap = [
    ("I", "Eb"),
    ("ii", "F-"),
    ("iii", "G-"),
    ("IV", "Ab"),
    ("V", "Bb"),
    ("vi", "C-"),
    ("vii", "D"),
];

const F_MAJOR: RootMap = [
    ("I", "F"),
    ("ii", "G-"),
    ("iii", "A-"),
    ("IV", "Bb"),
    ("V", "C"),
    ("vi", "D-"),
    ("vii", "E"),
];

const G_MAJOR: RootMap = [
    ("I", "G"),
    ("ii", "A-"),
    ("iii", "B-"),
    ("IV", "C"),
    ("V", "D"),
    ("vi", "E-"),
    ("vii", "F#"),
];

fn root_map(key: &str) -> &'static RootMap {
    match key {
        "C" => &C_MAJOR,
        "Eb" => &EB_MAJOR,
        "F" => &F_MAJOR,
        "G" => &G_MAJOR,
        _ => {
            debug!(key, "no root table for key, using C");
            &C_MAJOR
        }
    }
}

/// Numeral part of a slot: everything before the earliest terminator
pub fn numeral(slot: &str) -> &str {
    let end = NUMERAL_TERMINATORS
        .iter()
        .filter_map(|marker| slot.find(marker))
        .min()
        .unwrap_or(slot.len());
    &slot[..end]
}

/// Suffix to re-attach for a slot, if any quality marker is present
pub fn quality_suffix(slot: &str) -> Option<&'static str> {
    QUALITY_SUFFIXES
        .iter()
        .find(|(marker, _)| slot.contains(marker))
        .map(|(_, suffix)| *suffix)
}

/// Chord root for a numeral in a key
pub fn chord_root(numeral: &str, key: &str) -> &'static str {
    root_map(key)
        .iter()
        .find(|(n, _)| *n == numeral)
        .map(|(_, root)| *root)
        .unwrap_or(FALLBACK_ROOT)
}

/// Resolve a roman numeral slot to a concrete chord symbol in a key
pub fn resolve(slot: &str, key: &str) -> String {
    let root = chord_root(numeral(slot), key);
    match quality_suffix(slot) {
        Some(suffix) => format!("{}{}", root, suffix),
        None => root.to_string(),
    }
}
