// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled pitch names and octave-qualified pitches.
//!
//! Chord voicings are written as spelled note names with an octave digit
//! (e.g. "C3", "Eb4", "F#4"). Spelling is preserved exactly as written, so
//! "D#5" and "Eb5" are distinct pitches even though they sound the same.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Highest representable octave digit
pub const MAX_OCTAVE: u8 = 9;

/// Natural note letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Pitch class (0-11) of the natural note
    pub fn pitch_class(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    /// Step name as used by notation formats
    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Accidental attached to a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Chromatic alteration in semitones
    pub fn alter(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A spelled pitch class such as "C", "Eb" or "F#"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl PitchName {
    /// Parse a spelled name ("C", "C#", "Db").
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let letter = Letter::from_char(chars.next()?)?;
        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self { letter, accidental })
    }

    /// Read the root name at the start of a chord symbol.
    ///
    /// Takes the leading letter plus a directly following `#` or `b`;
    /// everything after is the chord quality.
    pub fn leading(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let accidental = match chars.next() {
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            _ => Accidental::Natural,
        };
        Some(Self { letter, accidental })
    }

    /// Get the pitch class (0-11)
    pub fn pitch_class(self) -> u8 {
        (self.letter.pitch_class() as i8 + self.accidental.alter()).rem_euclid(12) as u8
    }

    /// Position on the circle of fifths when used as a major key
    pub fn fifths(self) -> i8 {
        match self.pitch_class() {
            0 => 0,
            1 if self.accidental == Accidental::Sharp => 7,
            1 => -5,
            2 => 2,
            3 => -3,
            4 => 4,
            5 => -1,
            6 if self.accidental == Accidental::Sharp => 6,
            6 => -6,
            7 => 1,
            8 => -4,
            9 => 3,
            10 => -2,
            _ => 5,
        }
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "#"),
            Accidental::Flat => write!(f, "b"),
        }
    }
}

/// An octave-qualified pitch such as "Eb4"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    name: PitchName,
    octave: u8,
}

impl Pitch {
    /// Create a pitch; the octave is clamped to the representable range
    pub fn new(name: PitchName, octave: u8) -> Self {
        Self {
            name,
            octave: octave.min(MAX_OCTAVE),
        }
    }

    /// Parse a pitch written as name followed by a single octave digit
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidPitch(s.to_string());

        let last = s.chars().last().ok_or_else(invalid)?;
        let octave = last.to_digit(10).ok_or_else(invalid)? as u8;
        let head = &s[..s.len() - last.len_utf8()];
        let name = PitchName::parse(head).ok_or_else(invalid)?;

        Ok(Self::new(name, octave))
    }

    pub fn name(&self) -> PitchName {
        self.name
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Shift by whole octaves, clamped to [0, 9]
    pub fn octave_shifted(self, octaves: i8) -> Self {
        let octave = (self.octave as i16 + octaves as i16).clamp(0, MAX_OCTAVE as i16) as u8;
        Self { octave, ..self }
    }

    /// Same octave, different spelled name
    pub fn with_name(self, name: PitchName) -> Self {
        Self { name, ..self }
    }

    /// MIDI note number (middle C = C4 = 60), if representable
    pub fn midi_note(&self) -> Option<MidiNote> {
        let midi = (self.octave as i16 + 1) * 12
            + self.name.letter.pitch_class() as i16
            + self.name.accidental.alter() as i16;
        (0..=127).contains(&midi).then_some(midi as MidiNote)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pitch::parse(s)
    }
}

impl TryFrom<String> for Pitch {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Pitch::parse(&s)
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pitch() {
        let p = Pitch::parse("Eb4").unwrap();
        assert_eq!(p.name().letter, Letter::E);
        assert_eq!(p.name().accidental, Accidental::Flat);
        assert_eq!(p.octave(), 4);
        assert_eq!(p.to_string(), "Eb4");

        assert_eq!(Pitch::parse("F#4").unwrap().to_string(), "F#4");
        assert_eq!(Pitch::parse("C3").unwrap().to_string(), "C3");
    }

    #[test]
    fn test_parse_invalid_pitch() {
        assert!(Pitch::parse("").is_err());
        assert!(Pitch::parse("C").is_err());
        assert!(Pitch::parse("H4").is_err());
        assert!(Pitch::parse("Cx4").is_err());
        assert!(Pitch::parse("C#b4").is_err());
    }

    #[test]
    fn test_spelling_preserved() {
        let sharp = Pitch::parse("D#5").unwrap();
        let flat = Pitch::parse("Eb5").unwrap();
        assert_ne!(sharp, flat);
        assert_eq!(sharp.midi_note(), flat.midi_note());
    }

    #[test]
    fn test_octave_shift_clamped() {
        let p = Pitch::parse("C3").unwrap();
        assert_eq!(p.octave_shifted(1).to_string(), "C4");
        assert_eq!(p.octave_shifted(10).to_string(), "C9");
        assert_eq!(p.octave_shifted(-5).to_string(), "C0");
    }

    #[test]
    fn test_midi_note() {
        assert_eq!(Pitch::parse("C4").unwrap().midi_note(), Some(60));
        assert_eq!(Pitch::parse("A4").unwrap().midi_note(), Some(69));
        assert_eq!(Pitch::parse("Bb4").unwrap().midi_note(), Some(70));
        assert_eq!(Pitch::parse("Cb0").unwrap().midi_note(), Some(11));
        assert_eq!(Pitch::parse("B9").unwrap().midi_note(), None);
    }

    #[test]
    fn test_leading_root() {
        assert_eq!(PitchName::leading("Ebmaj7").unwrap().to_string(), "Eb");
        assert_eq!(PitchName::leading("F#7").unwrap().to_string(), "F#");
        assert_eq!(PitchName::leading("D-min7").unwrap().to_string(), "D");
        // "b" after the letter always reads as a flat
        assert_eq!(PitchName::leading("Bb").unwrap().to_string(), "Bb");
        assert!(PitchName::leading("xyz").is_none());
        assert!(PitchName::leading("").is_none());
    }

    #[test]
    fn test_key_fifths() {
        let fifths = |s: &str| PitchName::parse(s).unwrap().fifths();
        assert_eq!(fifths("C"), 0);
        assert_eq!(fifths("G"), 1);
        assert_eq!(fifths("F"), -1);
        assert_eq!(fifths("Eb"), -3);
        assert_eq!(fifths("F#"), 6);
        assert_eq!(fifths("Gb"), -6);
        assert_eq!(fifths("B"), 5);
    }

    #[test]
    fn test_pitch_serde() {
        let p = Pitch::parse("G#4").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"G#4\"");
        let back: Pitch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Pitch>("\"Q9\"").is_err());
    }
}
