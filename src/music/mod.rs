// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for orch.
//!
//! This module provides spelled pitch names and octave-qualified pitches
//! shared by the harmony, voicing and export stages.

pub mod pitch;

pub use pitch::{Accidental, Letter, MidiNote, Pitch, PitchName, MAX_OCTAVE};
