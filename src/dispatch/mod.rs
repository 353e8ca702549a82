// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named-function command surface.
//!
//! Callers invoke operations by name with a JSON parameter object and get a
//! JSON result back. Missing request fields are filled from the configured
//! defaults before the request is read. The same calls are served over a
//! line-delimited stream by [`server`].

pub mod server;

pub use server::{serve, serve_stdio};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::OrchestratorConfig;
use crate::error::{Error, Result};
use crate::export::{self, Composition, ExportFormat};
use crate::harmony::{form, GenerationRequest, MeasureEntry, ProgressionGenerator, Style, AVAILABLE_KEYS};
use crate::voicing::voice_progression;

/// Version reported by `validate_environment`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Functions callable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    GenerateHarmonicProgression,
    GenerateVoicings,
    Orchestrate,
    ExportMusicXml,
    ExportMidi,
    ExportPdf,
    ValidateEnvironment,
    GetAvailableKeys,
    GetAvailableForms,
    GetAvailableStyles,
}

impl Function {
    pub const ALL: [Function; 10] = [
        Function::GenerateHarmonicProgression,
        Function::GenerateVoicings,
        Function::Orchestrate,
        Function::ExportMusicXml,
        Function::ExportMidi,
        Function::ExportPdf,
        Function::ValidateEnvironment,
        Function::GetAvailableKeys,
        Function::GetAvailableForms,
        Function::GetAvailableStyles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::GenerateHarmonicProgression => "generate_harmonic_progression",
            Function::GenerateVoicings => "generate_voicings",
            Function::Orchestrate => "orchestrate",
            Function::ExportMusicXml => "export_musicxml",
            Function::ExportMidi => "export_midi",
            Function::ExportPdf => "export_pdf",
            Function::ValidateEnvironment => "validate_environment",
            Function::GetAvailableKeys => "get_available_keys",
            Function::GetAvailableForms => "get_available_forms",
            Function::GetAvailableStyles => "get_available_styles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// One request line: `{"function": ..., "params": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Call {
    pub function: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Default, Deserialize)]
struct VoicingParams {
    #[serde(default)]
    progression: Vec<MeasureEntry>,
}

/// Routes named calls to the generator, voicing engine and exporters
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: OrchestratorConfig,
}

impl Dispatcher {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Invoke a function by name
    pub fn call(&self, function: &str, params: Value) -> Result<Value> {
        let func = Function::from_name(function)
            .ok_or_else(|| Error::UnknownFunction(function.to_string()))?;
        debug!(function, "dispatching call");
        self.invoke(func, params)
    }

    pub fn invoke(&self, function: Function, params: Value) -> Result<Value> {
        let params = param_object(function, params)?;

        match function {
            Function::GenerateHarmonicProgression => {
                let request = self.request(function, params)?;
                let progression = ProgressionGenerator::for_request(&request).generate(&request);
                info!(
                    key = %progression.key,
                    form = %progression.form,
                    measures = progression.progression.len(),
                    "generated progression"
                );
                Ok(serde_json::to_value(progression)?)
            }
            Function::GenerateVoicings => {
                let voicing: VoicingParams = read_params(function, Value::Object(params))?;
                let voiced = voice_progression(&voicing.progression)?;
                Ok(serde_json::to_value(voiced)?)
            }
            Function::Orchestrate => {
                let measures = params.get("voicings").cloned().unwrap_or_else(|| json!([]));
                Ok(json!({ "measures": measures }))
            }
            Function::ExportMusicXml => self.export(function, ExportFormat::MusicXml, params),
            Function::ExportMidi => self.export(function, ExportFormat::Midi, params),
            Function::ExportPdf => self.export(function, ExportFormat::Pdf, params),
            Function::ValidateEnvironment => Ok(json!({ "valid": true, "version": VERSION })),
            Function::GetAvailableKeys => Ok(json!({ "keys": AVAILABLE_KEYS })),
            Function::GetAvailableForms => Ok(json!({ "forms": form::available_forms() })),
            Function::GetAvailableStyles => {
                let styles: Vec<&str> = Style::ALL.iter().map(|s| s.name()).collect();
                Ok(json!({ "styles": styles }))
            }
        }
    }

    /// Handle one protocol line; blank lines produce no response
    pub fn handle_line(&self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = serde_json::from_str::<Call>(line)
            .map_err(|e| Error::InvalidParams {
                function: "request".to_string(),
                message: e.to_string(),
            })
            .and_then(|call| self.call(&call.function, call.params));

        Some(response.unwrap_or_else(|e| error_response(&e)))
    }

    /// Generation request with configured defaults under the given fields
    fn request(&self, function: Function, params: Map<String, Value>) -> Result<GenerationRequest> {
        let defaults = serde_json::to_value(self.config.defaults.request())?;
        read_params(function, overlay(defaults, params))
    }

    fn export(&self, function: Function, format: ExportFormat, params: Map<String, Value>) -> Result<Value> {
        let defaults = json!({
            "title": self.config.defaults.title,
            "key": self.config.defaults.key,
            "tempo": self.config.defaults.tempo,
        });
        let composition: Composition = read_params(function, overlay(defaults, params))?;
        let exporter = export::exporter_for(format, self.config.export.midi_exporter());
        let result = export::export(exporter.as_ref(), &composition);
        Ok(serde_json::to_value(result)?)
    }
}

/// The `{"error": message}` response body
pub fn error_response(error: &Error) -> Value {
    json!({ "error": error.to_string() })
}

fn param_object(function: Function, params: Value) -> Result<Map<String, Value>> {
    match params {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidParams {
            function: function.name().to_string(),
            message: format!("expected an object, got {}", other),
        }),
    }
}

fn read_params<T: serde::de::DeserializeOwned>(function: Function, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::InvalidParams {
        function: function.name().to_string(),
        message: e.to_string(),
    })
}

/// Fields present in `params` replace those in `base`
fn overlay(base: Value, params: Map<String, Value>) -> Value {
    let mut merged = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(params);
    Value::Object(merged)
}
