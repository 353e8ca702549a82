// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voicing engine.
//!
//! A chord's pitch set is first extended to eight pitches by octave
//! doubling, then each instrument takes a pitch by fixed position. The
//! positional rules double the melody in flute and piano and share inner
//! voices between the string sections; fewer than eight pitches fall back
//! to the lowest available notes.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Orchestration, VoicingAssignment};
use crate::error::{Error, Result};
use crate::harmony::MeasureEntry;
use crate::music::{Pitch, MAX_OCTAVE};

/// Number of instrument parts
pub const VOICE_COUNT: usize = 8;

/// Voiced measures plus the ensemble description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicedProgression {
    pub voicings: Vec<MeasureEntry>,
    pub orchestration: Orchestration,
}

/// Extend a pitch set to exactly eight pitches.
///
/// Sets of eight or more are truncated. Smaller sets get octave doublings of
/// the original pitches appended in their original order, skipping any
/// doubling already present. The first pass doubles one octave up; while
/// the set is still short, each further pass doubles one octave higher.
/// Doublings are clamped at octave 9, so once every shift has been tried
/// the range is exhausted and an error is returned.
pub fn extend_pitches(symbol: &str, pitches: &[Pitch]) -> Result<Vec<Pitch>> {
    if pitches.is_empty() {
        return Ok(Vec::new());
    }
    if pitches.len() >= VOICE_COUNT {
        return Ok(pitches[..VOICE_COUNT].to_vec());
    }

    let mut extended = pitches.to_vec();

    for shift in 1..=MAX_OCTAVE as i8 {
        for pitch in pitches {
            if extended.len() == VOICE_COUNT {
                return Ok(extended);
            }
            let doubled = pitch.octave_shifted(shift);
            if !extended.contains(&doubled) {
                extended.push(doubled);
            }
        }
        if extended.len() == VOICE_COUNT {
            return Ok(extended);
        }
    }

    Err(Error::VoicingExhausted {
        symbol: symbol.to_string(),
        collected: extended.len(),
    })
}

/// Assign instruments from an ordered (low to high) pitch set
fn assign(pitches: &[Pitch]) -> VoicingAssignment {
    let n = pitches.len();
    let at = |i: usize| pitches.get(i).copied();
    let from_top = |k: usize| n.checked_sub(k).and_then(at);

    VoicingAssignment {
        flute: from_top(1),
        piano: if n > 1 { from_top(1) } else { at(0) },
        violin1: if n > 2 { from_top(2) } else { at(0) },
        violin2: if n > 3 { from_top(3) } else { at(1) },
        viola1: at(1),
        viola2: at(2).or_else(|| at(1)),
        cello: at(1).or_else(|| at(0)),
        bass: at(0),
    }
}

/// Voice a single chord across the ensemble
pub fn voice(symbol: &str, pitches: &[Pitch]) -> Result<VoicingAssignment> {
    let extended = extend_pitches(symbol, pitches)?;
    let voicing = assign(&extended);
    trace!(symbol, ?voicing, "voiced chord");
    Ok(voicing)
}

/// Voice every measure of a progression
pub fn voice_progression(measures: &[MeasureEntry]) -> Result<VoicedProgression> {
    let voicings = measures
        .iter()
        .map(|entry| {
            let voicing = voice(&entry.chord.symbol, &entry.chord.notes)?;
            Ok(MeasureEntry {
                voicing,
                ..entry.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VoicedProgression {
        voicings,
        orchestration: Orchestration::chamber_ensemble(),
    })
}
