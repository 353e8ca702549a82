// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for ORCH
//!
//! These tests drive the public API from form resolution through voicing
//! and export.

use orch::config::OrchestratorConfig;
use orch::dispatch::Dispatcher;
use orch::export::{self, Composition, ExportFormat, MidiFileFormat, MidiScoreExporter, MusicXmlExporter};
use orch::harmony::{
    analyze, form, ChordTable, FirstTemplate, FixedIndex, Form, GenerationRequest, HarmonicArea,
    HarmonicFunction, ProgressionGenerator, Style,
};
use orch::music::Pitch;
use orch::voicing::{extend_pitches, voice, voice_progression, Instrument, VOICE_COUNT};
use serde_json::json;
use tempfile::tempdir;

fn first_template(key: &str, form: &str, style: &str) -> orch::harmony::Progression {
    let request = GenerationRequest::new(key, form, style);
    ProgressionGenerator::new(Box::new(FirstTemplate)).generate(&request)
}

/// C, 16 bars, Jazz Pop: two eight-bar sections, fully voiced
#[test]
fn test_sixteen_bar_end_to_end() {
    let request = GenerationRequest::new("C", "16 bars", "Jazz Pop");
    let form = Form::resolve(&request.form);
    assert_eq!(form.sections.len(), 2);
    assert_eq!(form.sections[0].measures, 8);
    assert_eq!(form.sections[0].harmonic_area, HarmonicArea::Tonic);
    assert_eq!(form.sections[1].measures, 8);
    assert_eq!(form.sections[1].harmonic_area, HarmonicArea::Bridge);

    let progression = ProgressionGenerator::for_request(&request).generate(&request);
    assert_eq!(progression.progression.len(), 16);
    assert!(progression
        .progression
        .iter()
        .all(|m| !m.chord.symbol.is_empty() && !m.chord.notes.is_empty()));

    let voiced = voice_progression(&progression.progression).unwrap();
    assert_eq!(voiced.voicings.len(), 16);
    for entry in &voiced.voicings {
        for (instrument, pitch) in entry.voicing.iter() {
            assert!(pitch.is_some(), "measure {} has no {}", entry.measure, instrument);
        }
    }
}

/// Measure count equals the form total, numbered 1..=N without gaps
/// Chord pitch sets do not depend on whether the symbol has a table entry
#[test]
fn test_pitch_sets_are_root_renamed_base_shape() {
    let names = |entry: &orch::harmony::MeasureEntry| -> Vec<String> {
        entry.chord.notes.iter().map(ToString::to_string).collect()
    };

    let in_c = first_template("C", "16 bars", "Jazz Pop");
    assert_eq!(in_c.progression[0].chord.symbol, "Cmaj7");
    assert_eq!(names(&in_c.progression[0]), ["C3", "C4", "C4", "C4"]);
    assert_eq!(in_c.progression[1].chord.symbol, "A-min7");
    assert_eq!(names(&in_c.progression[1]), ["A3", "A4", "A4", "A4"]);

    let in_f = first_template("F", "16 bars", "Jazz Pop");
    assert_eq!(in_f.progression[3].chord.symbol, "C7");
    assert_eq!(names(&in_f.progression[3]), ["C3", "C4", "C4", "C4"]);
}

#[test]
fn test_measure_count_for_every_form() {
    let mut names = form::available_forms();
    names.push("Through-composed");

    for name in names {
        for style in Style::ALL.iter().map(|s| s.name()).chain(["Polka"]) {
            let progression = first_template("Eb", name, style);
            let total = Form::resolve(name).total_measures;
            assert_eq!(progression.progression.len() as u32, total, "{} / {}", name, style);
            for (i, entry) in progression.progression.iter().enumerate() {
                assert_eq!(entry.measure, i as u32 + 1);
            }
        }
    }
}

/// Every template in every pool voices completely in every key
#[test]
fn test_bass_present_whenever_chord_has_pitches() {
    for key in ["C", "Eb", "F", "G", "A"] {
        for style in Style::ALL {
            for index in 0..4 {
                let request = GenerationRequest::new(key, "ABAC", style.name());
                let progression = ProgressionGenerator::new(Box::new(FixedIndex(index))).generate(&request);
                let voiced = voice_progression(&progression.progression).unwrap();
                for entry in &voiced.voicings {
                    assert!(!entry.chord.notes.is_empty());
                    assert!(entry.voicing.bass.is_some(), "{} measure {}", key, entry.measure);
                }
            }
        }
    }
}

#[test]
fn test_unknown_symbol_defaults() {
    assert_eq!(HarmonicFunction::of_symbol("Xyz"), HarmonicFunction::Tonic);

    let table = ChordTable::global();
    let info = orch::harmony::ChordInfo::from_symbol("Xyz", table);
    assert_eq!(info.function, HarmonicFunction::Tonic);
    assert!(info.tensions.is_empty());
    // Unreadable root keeps the base shape
    assert_eq!(info.notes, table.get("Cmaj7").unwrap());
}

#[test]
fn test_extension_yields_eight() {
    let table = ChordTable::global();
    for symbol in table.symbols() {
        let extended = extend_pitches(symbol, table.get(symbol).unwrap()).unwrap();
        assert_eq!(extended.len(), VOICE_COUNT, "{}", symbol);
    }

    let voicing = voice("C7", table.get("C7").unwrap()).unwrap();
    assert!(voicing.is_complete());
    assert_eq!(voicing.get(Instrument::Bass), Some(Pitch::parse("C3").unwrap()));
}

#[test]
fn test_cadence_analysis_is_idempotent() {
    let progression = first_template("C", "AABA", "Bossa Nova");
    let first = analyze(&progression.progression);
    let second = analyze(&progression.progression);
    assert_eq!(first, second);
    assert_eq!(progression.analysis.cadences, first);

    // Bossa Nova tonic template ends V7 -> Imaj7 in each A section
    assert!(first.iter().any(|c| c.measure == 4));
}

#[test]
fn test_voicing_is_idempotent_with_pinned_selector() {
    let a = first_template("F", "32 bars", "ECM Style");
    let b = first_template("F", "32 bars", "ECM Style");
    assert_eq!(a, b);
    assert_eq!(
        voice_progression(&a.progression).unwrap(),
        voice_progression(&b.progression).unwrap()
    );
}

#[test]
fn test_seeded_requests_reproduce() {
    let request = GenerationRequest::new("G", "ABAC", "Jazz Pop").with_seed(1234);
    let a = ProgressionGenerator::for_request(&request).generate(&request);
    let b = ProgressionGenerator::for_request(&request).generate(&request);
    assert_eq!(a, b);
}

#[test]
fn test_export_all_formats() {
    let progression = first_template("Eb", "16 bars", "Jazz Pop");
    let voiced = voice_progression(&progression.progression).unwrap();
    let composition = Composition::new("Harbor Lights", "Eb", voiced.voicings);

    let xml = export::export(&MusicXmlExporter, &composition);
    assert!(xml.success);
    assert_eq!(xml.filename, "Harbor Lights.musicxml");
    let text = String::from_utf8(xml.bytes().unwrap()).unwrap();
    assert!(text.contains("<fifths>-3</fifths>"));

    for format in [MidiFileFormat::Type0, MidiFileFormat::Type1] {
        let midi = export::export(&MidiScoreExporter::new(480, format), &composition);
        assert!(midi.success);
        assert_eq!(midi.format, ExportFormat::Midi);
        assert!(midi.bytes().unwrap().starts_with(b"MThd"));
    }
}

#[test]
fn test_line_protocol_pipeline() {
    let dispatcher = Dispatcher::default();

    let line = json!({
        "function": "generate_harmonic_progression",
        "params": { "key": "F", "form": "16 bars", "style": "Bossa Nova", "seed": 8 }
    })
    .to_string();
    let progression = dispatcher.handle_line(&line).unwrap();
    assert_eq!(progression["progression"].as_array().unwrap().len(), 16);

    let line = json!({
        "function": "generate_voicings",
        "params": { "progression": progression["progression"] }
    })
    .to_string();
    let voiced = dispatcher.handle_line(&line).unwrap();
    assert_eq!(voiced["orchestration"]["balance"]["piano"], 0.9);
    assert!(voiced["voicings"][0]["voicing"]["bass"].is_string());

    let line = json!({
        "function": "export_midi",
        "params": { "title": "Pipeline", "measures": voiced["voicings"] }
    })
    .to_string();
    let exported = dispatcher.handle_line(&line).unwrap();
    assert_eq!(exported["success"], true);
    assert_eq!(exported["filename"], "Pipeline.mid");

    let unknown = dispatcher.handle_line(r#"{"function": "transpose"}"#).unwrap();
    assert_eq!(unknown["error"], "Unknown function: transpose");
}

#[test]
fn test_config_file_drives_dispatcher() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orch.yaml");
    std::fs::write(
        &path,
        r#"
defaults:
  key: "G"
  form: "16 bars"
  style: "Bossa Nova"
  title: "Sketch"
export:
  midi_format: type0
"#,
    )
    .unwrap();

    let config = OrchestratorConfig::load(&path).unwrap();
    config.validate().unwrap();
    let dispatcher = Dispatcher::new(config);

    let progression = dispatcher
        .call("generate_harmonic_progression", json!({}))
        .unwrap();
    assert_eq!(progression["key"], "G");
    assert_eq!(progression["progression"].as_array().unwrap().len(), 16);

    let exported = dispatcher.call("export_midi", json!({})).unwrap();
    assert_eq!(exported["filename"], "Sketch.mid");
    let result: export::ExportResult = serde_json::from_value(exported).unwrap();
    // Type 0 header
    assert_eq!(result.bytes().unwrap()[9], 0);
}
