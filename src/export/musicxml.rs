// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MusicXML (score-partwise 3.1) export.
//!
//! One part per instrument and one whole note per measure. Empty voicing
//! slots become whole-measure rests. The flute part carries the chord
//! symbols as `<harmony>` elements.

use super::{Composition, ExportFormat, ScoreExporter};
use crate::error::Result;
use crate::harmony::{Dynamics, MeasureEntry};
use crate::music::{Accidental, Pitch, PitchName};
use crate::voicing::Instrument;

const DOCTYPE: &str = r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#;

/// Divisions per quarter note; a whole note lasts four
const DIVISIONS: u32 = 1;
const WHOLE_NOTE: u32 = DIVISIONS * 4;

/// Clef sign and staff line for each part
fn clef(instrument: Instrument) -> (&'static str, u8) {
    match instrument {
        Instrument::Viola1 | Instrument::Viola2 => ("C", 3),
        Instrument::Cello | Instrument::Bass => ("F", 4),
        _ => ("G", 2),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Indenting string builder for the document
struct MusicXmlBuilder {
    out: String,
    depth: usize,
}

impl MusicXmlBuilder {
    fn new() -> Self {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(DOCTYPE);
        out.push('\n');
        Self { out, depth: 0 }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{}>", tag));
        self.depth += 1;
    }

    /// Close an element opened with `open`; attributes are dropped from the name
    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        let name = tag.split_whitespace().next().unwrap_or(tag);
        self.line(&format!("</{}>", name));
    }

    fn leaf(&mut self, tag: &str, text: impl std::fmt::Display) {
        let name = tag.split_whitespace().next().unwrap_or(tag);
        self.line(&format!("<{}>{}</{}>", tag, text, name));
    }

    fn finish(self) -> String {
        self.out
    }

    fn header(&mut self, composition: &Composition) {
        self.open("work");
        self.leaf("work-title", escape(&composition.title));
        self.close("work");

        self.open("identification");
        self.leaf("creator type=\"composer\"", "orch");
        self.open("encoding");
        self.leaf("software", concat!("orch ", env!("CARGO_PKG_VERSION")));
        self.close("encoding");
        self.close("identification");

        self.open("part-list");
        for (index, instrument) in Instrument::ALL.iter().enumerate() {
            self.open(&format!("score-part id=\"P{}\"", index + 1));
            self.leaf("part-name", instrument.display_name());
            self.close("score-part");
        }
        self.close("part-list");
    }

    fn attributes(&mut self, instrument: Instrument, fifths: i8) {
        let (sign, line) = clef(instrument);
        self.open("attributes");
        self.leaf("divisions", DIVISIONS);
        self.open("key");
        self.leaf("fifths", fifths);
        self.close("key");
        self.open("time");
        self.leaf("beats", 4);
        self.leaf("beat-type", 4);
        self.close("time");
        self.open("clef");
        self.leaf("sign", sign);
        self.leaf("line", line);
        self.close("clef");
        self.close("attributes");
    }

    fn dynamics(&mut self, dynamics: Dynamics) {
        let mark = match dynamics {
            Dynamics::Forte => "<f/>",
            Dynamics::MezzoForte => "<mf/>",
        };
        self.open("direction placement=\"below\"");
        self.open("direction-type");
        self.open("dynamics");
        self.line(mark);
        self.close("dynamics");
        self.close("direction-type");
        self.close("direction");
    }

    fn harmony(&mut self, symbol: &str) {
        let Some(root) = PitchName::leading(symbol) else {
            return;
        };
        let root_len = root.to_string().len();
        let quality = symbol.get(root_len..).unwrap_or("");

        self.open("harmony");
        self.open("root");
        self.leaf("root-step", root.letter.as_char());
        if root.accidental != Accidental::Natural {
            self.leaf("root-alter", root.accidental.alter());
        }
        self.close("root");
        self.leaf(&format!("kind text=\"{}\"", escape(quality)), "other");
        self.close("harmony");
    }

    fn note(&mut self, pitch: Option<Pitch>) {
        self.open("note");
        match pitch {
            Some(pitch) => {
                let name = pitch.name();
                self.open("pitch");
                self.leaf("step", name.letter.as_char());
                if name.accidental != Accidental::Natural {
                    self.leaf("alter", name.accidental.alter());
                }
                self.leaf("octave", pitch.octave());
                self.close("pitch");
            }
            None => self.line("<rest measure=\"yes\"/>"),
        }
        self.leaf("duration", WHOLE_NOTE);
        if pitch.is_some() {
            self.leaf("type", "whole");
        }
        self.close("note");
    }

    fn part(&mut self, index: usize, instrument: Instrument, measures: &[MeasureEntry], fifths: i8) {
        self.open(&format!("part id=\"P{}\"", index + 1));

        if measures.is_empty() {
            self.open("measure number=\"1\"");
            self.attributes(instrument, fifths);
            self.note(None);
            self.close("measure");
        }

        let mut last_dynamics = None;
        for (position, entry) in measures.iter().enumerate() {
            self.open(&format!("measure number=\"{}\"", entry.measure));
            if position == 0 {
                self.attributes(instrument, fifths);
            }
            if instrument == Instrument::Flute {
                self.harmony(&entry.chord.symbol);
            }
            if last_dynamics != Some(entry.dynamics) {
                self.dynamics(entry.dynamics);
                last_dynamics = Some(entry.dynamics);
            }
            self.note(entry.voicing.get(instrument));
            self.close("measure");
        }

        self.close("part");
    }
}

/// Render a composition as a MusicXML document
pub fn render(composition: &Composition) -> String {
    let fifths = PitchName::parse(&composition.key)
        .map(PitchName::fifths)
        .unwrap_or(0);

    let mut builder = MusicXmlBuilder::new();
    builder.open("score-partwise version=\"3.1\"");
    builder.header(composition);
    for (index, instrument) in Instrument::ALL.iter().enumerate() {
        builder.part(index, *instrument, &composition.measures, fifths);
    }
    builder.close("score-partwise");
    builder.finish()
}

/// Score exporter producing MusicXML text
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicXmlExporter;

impl ScoreExporter for MusicXmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::MusicXml
    }

    fn encode(&self, composition: &Composition) -> Result<Vec<u8>> {
        Ok(render(composition).into_bytes())
    }
}
