// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the orchestrator.
//!
//! Holds the generation defaults applied when a request or command line
//! leaves a field out, and the export settings. Files are YAML or TOML,
//! chosen by extension.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::export::{MidiFileFormat, MidiScoreExporter, DEFAULT_TEMPO, DEFAULT_TITLE};
use crate::harmony::{form, Complexity, GenerationRequest, Style, AVAILABLE_KEYS};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// File syntax, picked from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Yaml,
    Toml,
}

impl Syntax {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Syntax::Toml,
            _ => Syntax::Yaml,
        }
    }
}

impl OrchestratorConfig {
    /// Load a configuration file (`.toml` as TOML, anything else as YAML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        match Syntax::of(path) {
            Syntax::Toml => Self::from_toml(&contents),
            Syntax::Yaml => Self::from_yaml(&contents),
        }
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save configuration, in the syntax matching the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = match Syntax::of(path) {
            Syntax::Toml => self.to_toml()?,
            Syntax::Yaml => self.to_yaml()?,
        };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Reject settings no export could use; warn about names that will fall back
    pub fn validate(&self) -> Result<()> {
        if self.export.ppqn == 0 {
            bail!("export.ppqn must be greater than zero");
        }
        if !(self.defaults.tempo.is_finite() && self.defaults.tempo > 0.0) {
            bail!("defaults.tempo must be a positive number, got {}", self.defaults.tempo);
        }

        if !AVAILABLE_KEYS.contains(&self.defaults.key.as_str()) {
            warn!(key = %self.defaults.key, "unrecognized default key");
        }
        if !form::is_known(&self.defaults.form) {
            warn!(form = %self.defaults.form, "unknown default form, generation will use AABA");
        }
        if Style::from_name(&self.defaults.style).is_none() {
            warn!(style = %self.defaults.style, "unknown default style, default templates apply");
        }
        Ok(())
    }
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_form")]
    pub form: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub complexity: Complexity,
    /// Tempo in BPM, used by exports
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    #[serde(default = "default_title")]
    pub title: String,
    /// Fixed seed for reproducible template choice
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_key() -> String {
    "C".to_string()
}
fn default_form() -> String {
    form::DEFAULT_FORM.to_string()
}
fn default_style() -> String {
    Style::JazzPop.name().to_string()
}
fn default_tempo() -> f64 {
    DEFAULT_TEMPO
}
fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            form: default_form(),
            style: default_style(),
            complexity: Complexity::default(),
            tempo: default_tempo(),
            title: default_title(),
            seed: None,
        }
    }
}

impl DefaultsConfig {
    /// Generation request built from these defaults
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            key: self.key.clone(),
            form: self.form.clone(),
            style: self.style.clone(),
            complexity: self.complexity,
            seed: self.seed,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// MIDI ticks per quarter note
    #[serde(default = "default_ppqn")]
    pub ppqn: u16,
    #[serde(default)]
    pub midi_format: MidiFileFormat,
}

fn default_ppqn() -> u16 {
    crate::export::midi::DEFAULT_PPQN
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ppqn: default_ppqn(),
            midi_format: MidiFileFormat::default(),
        }
    }
}

impl ExportConfig {
    pub fn midi_exporter(&self) -> MidiScoreExporter {
        MidiScoreExporter::new(self.ppqn, self.midi_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
defaults:
  key: "Eb"
  form: "ABAC"
  style: "Bossa Nova"
  complexity: Complex
  tempo: 96
  seed: 7
export:
  ppqn: 960
  midi_format: type0
"#;

        let config = OrchestratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.defaults.key, "Eb");
        assert_eq!(config.defaults.form, "ABAC");
        assert_eq!(config.defaults.style, "Bossa Nova");
        assert_eq!(config.defaults.complexity, Complexity::Complex);
        assert_eq!(config.defaults.tempo, 96.0);
        assert_eq!(config.defaults.seed, Some(7));
        assert_eq!(config.defaults.title, "composition");
        assert_eq!(config.export.ppqn, 960);
        assert_eq!(config.export.midi_format, MidiFileFormat::Type0);
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
[defaults]
key = "G"
form = "16 bars"

[export]
midi_format = "type1"
"#;

        let config = OrchestratorConfig::from_toml(text).unwrap();
        assert_eq!(config.defaults.key, "G");
        assert_eq!(config.defaults.form, "16 bars");
        assert_eq!(config.defaults.style, "Jazz Pop");
        assert_eq!(config.export.ppqn, 480);
        assert_eq!(config.export.midi_format, MidiFileFormat::Type1);
    }

    #[test]
    fn test_default_values() {
        let config = OrchestratorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, OrchestratorConfig::default());
        assert_eq!(config.defaults.key, "C");
        assert_eq!(config.defaults.form, "AABA");
        assert_eq!(config.defaults.tempo, 120.0);
        assert!(config.defaults.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_from_defaults() {
        let mut defaults = DefaultsConfig::default();
        defaults.seed = Some(3);
        let request = defaults.request();
        assert_eq!(request.key, "C");
        assert_eq!(request.form, "AABA");
        assert_eq!(request.style, "Jazz Pop");
        assert_eq!(request.seed, Some(3));
    }

    #[test]
    fn test_round_trip_by_extension() {
        let dir = tempdir().unwrap();
        let mut config = OrchestratorConfig::default();
        config.defaults.key = "F".to_string();
        config.defaults.seed = Some(42);
        config.export.midi_format = MidiFileFormat::Type0;

        for name in ["orch.yaml", "orch.toml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = OrchestratorConfig::load(&path).unwrap();
            assert_eq!(loaded, config, "{}", name);
        }

        let toml_text = std::fs::read_to_string(dir.path().join("orch.toml")).unwrap();
        assert!(toml_text.contains("[defaults]"));
    }

    #[test]
    fn test_invalid_files() {
        let dir = tempdir().unwrap();

        let yaml_path = dir.path().join("bad.yaml");
        std::fs::write(&yaml_path, "this is not valid yaml: [").unwrap();
        assert!(OrchestratorConfig::load(&yaml_path).is_err());

        let toml_path = dir.path().join("bad.toml");
        std::fs::write(&toml_path, "[defaults\nkey = ").unwrap();
        assert!(OrchestratorConfig::load(&toml_path).is_err());

        assert!(OrchestratorConfig::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut config = OrchestratorConfig::default();
        config.export.ppqn = 0;
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.defaults.tempo = -1.0;
        assert!(config.validate().is_err());

        // Unknown names fall back at generation time
        let mut config = OrchestratorConfig::default();
        config.defaults.form = "Rondo".to_string();
        assert!(config.validate().is_ok());
    }
}
