// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic progression generator and chamber ensemble voicing engine.
//!
//! A song form is resolved into sections, each section is filled from a
//! roman-numeral template in the requested key and style, and every chord
//! is then voiced across eight instrument parts. Voiced progressions can be
//! exported as MusicXML or Standard MIDI Files, and every operation is
//! reachable by name through the [`dispatch`] surface.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod harmony;
pub mod music;
pub mod voicing;

pub use error::{Error, Result};
