// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes a voiced composition as a Type 0 or Type 1 MIDI file, one track
//! per instrument with its General MIDI program, one whole note per measure.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{Composition, ExportFormat, ScoreExporter};
use crate::error::{Error, Result};
use crate::voicing::Instrument;

pub const DEFAULT_PPQN: u16 = 480;

/// Beats in every exported measure (4/4)
const BEATS_PER_MEASURE: u64 = 4;

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Tempo track plus one track per part
    #[default]
    Type1,
}

/// A track for export
#[derive(Debug, Clone)]
pub struct ExportTrack {
    /// Track name
    pub name: String,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Notes in this track
    pub notes: Vec<ExportNote>,
    /// Program change at start (None = no change)
    pub program: Option<u8>,
}

impl ExportTrack {
    pub fn new(name: impl Into<String>, channel: u8) -> Self {
        Self {
            name: name.into(),
            channel,
            notes: Vec::new(),
            program: None,
        }
    }

    pub fn add_note(&mut self, note: ExportNote) {
        self.notes.push(note);
    }

    pub fn with_program(mut self, program: u8) -> Self {
        self.program = Some(program);
        self
    }
}

/// A note for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNote {
    /// Start tick
    pub tick: u64,
    /// Note number (0-127)
    pub note: u8,
    /// Velocity (1-127)
    pub velocity: u8,
    /// Duration in ticks
    pub duration: u64,
}

impl ExportNote {
    pub fn new(tick: u64, note: u8, velocity: u8, duration: u64) -> Self {
        Self {
            tick,
            note,
            velocity,
            duration,
        }
    }

    pub fn end_tick(&self) -> u64 {
        self.tick + self.duration
    }
}

#[derive(Debug, Clone)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            data: vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            data: vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn program_change(tick: u64, channel: u8, program: u8) -> Self {
        Self {
            tick,
            data: vec![0xC0 | (channel & 0x0F), program & 0x7F],
        }
    }

    fn tempo(tick: u64, bpm: f64) -> Self {
        let microseconds = (60_000_000.0 / bpm) as u32;
        Self {
            tick,
            data: vec![
                0xFF, 0x51, 0x03,
                ((microseconds >> 16) & 0xFF) as u8,
                ((microseconds >> 8) & 0xFF) as u8,
                (microseconds & 0xFF) as u8,
            ],
        }
    }

    fn time_signature(tick: u64, numerator: u8, denominator: u8) -> Self {
        // Denominator is written as a power of 2
        let denom_power = denominator.max(1).ilog2() as u8;
        Self {
            tick,
            data: vec![
                0xFF, 0x58, 0x04,
                numerator,
                denom_power,
                24, // MIDI clocks per metronome click
                8,  // 32nd notes per MIDI quarter note
            ],
        }
    }

    fn track_name(tick: u64, name: &str) -> Self {
        // Single-byte length keeps the meta event simple
        let bytes = &name.as_bytes()[..name.len().min(127)];
        let mut data = vec![0xFF, 0x03, bytes.len() as u8];
        data.extend_from_slice(bytes);
        Self { tick, data }
    }

    fn end_of_track() -> Self {
        Self {
            tick: 0,
            data: vec![0xFF, 0x2F, 0x00],
        }
    }

    fn for_track(track: &ExportTrack, events: &mut Vec<MidiExportEvent>) {
        if let Some(program) = track.program {
            events.push(MidiExportEvent::program_change(0, track.channel, program));
        }
        for note in &track.notes {
            events.push(MidiExportEvent::note_on(
                note.tick,
                track.channel,
                note.note,
                note.velocity,
            ));
            events.push(MidiExportEvent::note_off(note.end_tick(), track.channel, note.note));
        }
    }
}

/// MIDI file writer
#[derive(Debug, Clone)]
pub struct MidiExporter {
    format: MidiFileFormat,
    /// Ticks per quarter note
    ppqn: u16,
    /// Tempo in BPM
    tempo: f64,
    tracks: Vec<ExportTrack>,
}

impl MidiExporter {
    pub fn new() -> Self {
        Self {
            format: MidiFileFormat::default(),
            ppqn: DEFAULT_PPQN,
            tempo: 120.0,
            tracks: Vec::new(),
        }
    }

    pub fn set_format(&mut self, format: MidiFileFormat) {
        self.format = format;
    }

    pub fn set_ppqn(&mut self, ppqn: u16) {
        self.ppqn = ppqn.max(1);
    }

    /// Set tempo (clamped to 20-300 BPM)
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = bpm.clamp(20.0, 300.0);
    }

    pub fn add_track(&mut self, track: ExportTrack) {
        self.tracks.push(track);
    }

    /// Export to bytes
    pub fn export_to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self.format {
            MidiFileFormat::Type0 => self.write_type0(writer),
            MidiFileFormat::Type1 => self.write_type1(writer),
        }
    }

    fn write_type0<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut events = vec![
            MidiExportEvent::tempo(0, self.tempo),
            MidiExportEvent::time_signature(0, BEATS_PER_MEASURE as u8, 4),
        ];
        for track in &self.tracks {
            MidiExportEvent::for_track(track, &mut events);
        }

        // Stable sort keeps note-offs ahead of note-ons at the same tick
        events.sort_by_key(|e| e.tick);

        self.write_header(writer, 0, 1)?;
        self.write_track(writer, &events)
    }

    fn write_type1<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let num_tracks = self.tracks.len() + 1; // +1 for tempo track
        let num_tracks = u16::try_from(num_tracks)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many tracks"))?;

        self.write_header(writer, 1, num_tracks)?;

        let tempo_events = [
            MidiExportEvent::tempo(0, self.tempo),
            MidiExportEvent::time_signature(0, BEATS_PER_MEASURE as u8, 4),
            MidiExportEvent::track_name(0, "Tempo"),
        ];
        self.write_track(writer, &tempo_events)?;

        for track in &self.tracks {
            let mut events = vec![MidiExportEvent::track_name(0, &track.name)];
            MidiExportEvent::for_track(track, &mut events);
            events.sort_by_key(|e| e.tick);
            self.write_track(writer, &events)?;
        }

        Ok(())
    }

    fn write_header<W: Write>(&self, writer: &mut W, format: u16, num_tracks: u16) -> io::Result<()> {
        writer.write_all(b"MThd")?;
        // Chunk length (always 6)
        writer.write_all(&[0, 0, 0, 6])?;
        writer.write_all(&format.to_be_bytes())?;
        writer.write_all(&num_tracks.to_be_bytes())?;
        writer.write_all(&self.ppqn.to_be_bytes())?;
        Ok(())
    }

    fn write_track<W: Write>(&self, writer: &mut W, events: &[MidiExportEvent]) -> io::Result<()> {
        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in events {
            let delta = event.tick.saturating_sub(last_tick);
            let delta = u32::try_from(delta)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "delta time overflow"))?;
            write_variable_length(&mut track_data, delta)?;
            track_data.extend_from_slice(&event.data);
            last_tick = event.tick;
        }

        write_variable_length(&mut track_data, 0)?;
        track_data.extend_from_slice(&MidiExportEvent::end_of_track().data);

        writer.write_all(b"MTrk")?;
        let length = track_data.len() as u32;
        writer.write_all(&length.to_be_bytes())?;
        writer.write_all(&track_data)?;

        Ok(())
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a variable-length quantity
fn write_variable_length<W: Write>(writer: &mut W, mut value: u32) -> io::Result<()> {
    let mut bytes = Vec::new();

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    writer.write_all(&bytes)
}

/// Velocity for a marking, scaled by the instrument's mix level
pub fn scaled_velocity(base: u8, balance: f64) -> u8 {
    (base as f64 * balance).round().clamp(1.0, 127.0) as u8
}

/// Score exporter producing Standard MIDI Files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiScoreExporter {
    pub ppqn: u16,
    pub format: MidiFileFormat,
}

impl Default for MidiScoreExporter {
    fn default() -> Self {
        Self {
            ppqn: DEFAULT_PPQN,
            format: MidiFileFormat::default(),
        }
    }
}

impl MidiScoreExporter {
    pub fn new(ppqn: u16, format: MidiFileFormat) -> Self {
        Self { ppqn, format }
    }

    /// One track per instrument, on its own channel
    pub fn tracks(&self, composition: &Composition) -> Result<Vec<ExportTrack>> {
        let ticks_per_measure = self.ppqn.max(1) as u64 * BEATS_PER_MEASURE;

        Instrument::ALL
            .iter()
            .enumerate()
            .map(|(channel, &instrument)| {
                let mut track = ExportTrack::new(instrument.display_name(), channel as u8)
                    .with_program(instrument.midi_program());

                for entry in &composition.measures {
                    let Some(pitch) = entry.voicing.get(instrument) else {
                        continue;
                    };
                    let note = pitch.midi_note().ok_or_else(|| {
                        Error::Export(format!(
                            "{} in measure {} is outside the MIDI note range",
                            pitch, entry.measure
                        ))
                    })?;
                    let tick = entry.measure.saturating_sub(1) as u64 * ticks_per_measure;
                    let velocity = scaled_velocity(entry.dynamics.velocity(), instrument.balance());
                    track.add_note(ExportNote::new(tick, note, velocity, ticks_per_measure));
                }

                track.notes.sort_by_key(|n| n.tick);
                Ok(track)
            })
            .collect()
    }
}

impl ScoreExporter for MidiScoreExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Midi
    }

    fn encode(&self, composition: &Composition) -> Result<Vec<u8>> {
        if !(composition.tempo.is_finite() && composition.tempo > 0.0) {
            return Err(Error::Export(format!("invalid tempo: {}", composition.tempo)));
        }

        let mut exporter = MidiExporter::new();
        exporter.set_format(self.format);
        exporter.set_ppqn(self.ppqn);
        exporter.set_tempo(composition.tempo);
        for track in self.tracks(composition)? {
            exporter.add_track(track);
        }

        Ok(exporter.export_to_bytes()?)
    }
}
