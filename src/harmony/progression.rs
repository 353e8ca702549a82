// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Progression generator.
//!
//! Walks the sections of a form, picks a roman numeral template for each,
//! tiles it across the section and resolves every slot into a chord in the
//! requested key. Template choice goes through a [`TemplateSelector`], so a
//! generator built with a seeded or fixed selector is fully reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cadence::{analyze, Cadence};
use super::chord_table::ChordTable;
use super::form::{Form, DEFAULT_FORM};
use super::roman;
use super::{Articulation, ChordInfo, Complexity, Dynamics, MeasureEntry, Style};
use crate::voicing::VoicingAssignment;

/// Chooses one template out of a pool
pub trait TemplateSelector: Send {
    /// Return an index below `candidates` (which is never zero)
    fn select(&mut self, candidates: usize) -> usize;
}

/// Uniform random choice
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Selector seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible selector
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSelector for RandomSelector {
    fn select(&mut self, candidates: usize) -> usize {
        self.rng.gen_range(0..candidates)
    }
}

/// Always the first template of the pool
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTemplate;

impl TemplateSelector for FirstTemplate {
    fn select(&mut self, _candidates: usize) -> usize {
        0
    }
}

/// A fixed index, wrapped to the pool size
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl TemplateSelector for FixedIndex {
    fn select(&mut self, candidates: usize) -> usize {
        self.0 % candidates
    }
}

fn default_key() -> String {
    "C".to_string()
}
fn default_form() -> String {
    DEFAULT_FORM.to_string()
}
fn default_style() -> String {
    "Jazz Pop".to_string()
}

/// Parameters of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_form")]
    pub form: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub complexity: Complexity,
    /// Pins template selection when present
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            key: default_key(),
            form: default_form(),
            style: default_style(),
            complexity: Complexity::default(),
            seed: None,
        }
    }
}

impl GenerationRequest {
    pub fn new(key: impl Into<String>, form: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            form: form.into(),
            style: style.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Selector matching this request: seeded when a seed is given
    pub fn selector(&self) -> Box<dyn TemplateSelector> {
        match self.seed {
            Some(seed) => Box::new(RandomSelector::seeded(seed)),
            None => Box::new(RandomSelector::new()),
        }
    }
}

/// Analysis attached to a generated progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(rename = "keyCenter")]
    pub key_center: String,
    #[serde(default)]
    pub modulations: Vec<String>,
    #[serde(default)]
    pub cadences: Vec<Cadence>,
}

/// Generated progression with its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub progression: Vec<MeasureEntry>,
    pub key: String,
    pub form: String,
    pub analysis: Analysis,
}

/// Progression generator
pub struct ProgressionGenerator {
    table: &'static ChordTable,
    selector: Box<dyn TemplateSelector>,
}

impl ProgressionGenerator {
    /// Create a generator with the given selection strategy
    pub fn new(selector: Box<dyn TemplateSelector>) -> Self {
        Self {
            table: ChordTable::global(),
            selector,
        }
    }

    /// Generator whose template choice follows the request's seed
    pub fn for_request(request: &GenerationRequest) -> Self {
        Self::new(request.selector())
    }

    /// Generate the measures and analysis for a request
    pub fn generate(&mut self, request: &GenerationRequest) -> Progression {
        let form = Form::resolve(&request.form);
        let measures = self.generate_measures(&form, request);
        let cadences = analyze(&measures);

        debug!(
            key = %request.key,
            form = %request.form,
            style = %request.style,
            complexity = ?request.complexity,
            measures = measures.len(),
            cadences = cadences.len(),
            "generated progression"
        );

        Progression {
            progression: measures,
            key: request.key.clone(),
            form: request.form.clone(),
            analysis: Analysis {
                key_center: request.key.clone(),
                modulations: Vec::new(),
                cadences,
            },
        }
    }

    /// Resolve every section of a form into measure entries
    pub fn generate_measures(&mut self, form: &Form, request: &GenerationRequest) -> Vec<MeasureEntry> {
        let style = Style::from_name(&request.style);
        if style.is_none() {
            debug!(style = %request.style, "unknown style, using default templates");
        }
        let articulation = Articulation::for_style(&request.style);

        let mut measures = Vec::with_capacity(form.total_measures as usize);

        for (start, section) in form.sections_with_offsets() {
            let pool = ChordTable::templates(style, section.harmonic_area);
            let choice = self.selector.select(pool.len()) % pool.len();
            let template = pool[choice];

            debug!(
                section = %section.name,
                area = ?section.harmonic_area,
                template = ?template,
                "selected template"
            );

            for offset in 0..section.measures {
                let slot = template[offset as usize % template.len()];
                let symbol = roman::resolve(slot, &request.key);

                measures.push(MeasureEntry {
                    measure: start + offset + 1,
                    chord: ChordInfo::from_symbol(symbol, self.table),
                    voicing: VoicingAssignment::default(),
                    dynamics: Dynamics::for_measure(section.harmonic_area, offset, section.measures),
                    articulation,
                });
            }
        }

        measures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::{HarmonicArea, HarmonicFunction, Tension};

    fn pinned() -> ProgressionGenerator {
        ProgressionGenerator::new(Box::new(FirstTemplate))
    }

    fn symbols(measures: &[MeasureEntry]) -> Vec<&str> {
        measures.iter().map(|m| m.chord.symbol.as_str()).collect()
    }

    #[test]
    fn test_fixed_selectors() {
        assert_eq!(FirstTemplate.select(4), 0);
        assert_eq!(FixedIndex(2).select(4), 2);
        assert_eq!(FixedIndex(5).select(4), 1);
    }

    #[test]
    fn test_random_selector_in_range() {
        let mut selector = RandomSelector::seeded(7);
        for _ in 0..100 {
            assert!(selector.select(3) < 3);
        }
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let mut a = RandomSelector::seeded(42);
        let mut b = RandomSelector::seeded(42);
        let picks_a: Vec<_> = (0..20).map(|_| a.select(4)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.select(4)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_template_tiling() {
        let mut gen = pinned();
        let result = gen.generate(&GenerationRequest::new("C", "16 bars", "Jazz Pop"));
        let syms = symbols(&result.progression);

        // First Jazz Pop tonic template repeats twice over 8 measures
        assert_eq!(
            &syms[..8],
            ["Cmaj7", "A-min7", "D-min7", "G7", "Cmaj7", "A-min7", "D-min7", "G7"]
        );
        // First bridge template
        assert_eq!(&syms[8..12], ["E-min7", "C7", "D-min7", "G7"]);
    }

    #[test]
    fn test_measure_numbers_contiguous() {
        let mut gen = pinned();
        let result = gen.generate(&GenerationRequest::new("F", "ABAC", "Bossa Nova"));
        let numbers: Vec<u32> = result.progression.iter().map(|m| m.measure).collect();
        assert_eq!(numbers, (1..=32).collect::<Vec<_>>());
    }

    #[test]
    fn test_dynamics_and_articulation() {
        let mut gen = pinned();
        let result = gen.generate(&GenerationRequest::new("C", "16 bars", "ECM Style"));
        let measures = &result.progression;

        assert!(measures[..8].iter().all(|m| m.dynamics == Dynamics::MezzoForte));
        assert!(measures[8..12].iter().all(|m| m.dynamics == Dynamics::Forte));
        assert!(measures[12..].iter().all(|m| m.dynamics == Dynamics::MezzoForte));
        assert!(measures.iter().all(|m| m.articulation == Articulation::MoltoLegato));
    }

    #[test]
    fn test_unknown_style_uses_default_template() {
        let mut gen = ProgressionGenerator::new(Box::new(FixedIndex(3)));
        let result = gen.generate(&GenerationRequest::new("C", "AABA", "Polka"));
        assert_eq!(&symbols(&result.progression)[..4], ["Cmaj7", "A-min7", "D-min7", "G7"]);
    }

    #[test]
    fn test_functions_and_tensions_attached() {
        let mut gen = ProgressionGenerator::new(Box::new(FixedIndex(1)));
        let result = gen.generate(&GenerationRequest::new("C", "16 bars", "Jazz Pop"));
        let first = &result.progression[0].chord;
        assert_eq!(first.symbol, "Cmaj9");
        assert_eq!(first.function, HarmonicFunction::Tonic);
        assert_eq!(first.tensions, vec![Tension::Ninth]);
        // Pitch sets are the Cmaj7 shape renamed to the root, even for table symbols
        let notes: Vec<String> = first.notes.iter().map(ToString::to_string).collect();
        assert_eq!(notes, ["C3", "C4", "C4", "C4"]);

        let second = &result.progression[1].chord;
        assert_eq!(second.symbol, "F6/9");
        assert_eq!(second.function, HarmonicFunction::Tonic);
    }

    #[test]
    fn test_voicing_starts_empty() {
        let mut gen = pinned();
        let result = gen.generate(&GenerationRequest::default());
        assert!(result.progression.iter().all(|m| m.voicing.is_empty()));
    }

    #[test]
    fn test_analysis_fields() {
        let mut gen = pinned();
        let result = gen.generate(&GenerationRequest::new("Eb", "AABA", "Jazz Pop"));
        assert_eq!(result.key, "Eb");
        assert_eq!(result.form, "AABA");
        assert_eq!(result.analysis.key_center, "Eb");
        assert!(result.analysis.modulations.is_empty());
        // V7 -> Imaj7 turnaround at every template repeat
        assert!(!result.analysis.cadences.is_empty());
    }

    #[test]
    fn test_seeded_requests_reproducible() {
        let request = GenerationRequest::new("G", "AABA", "Jazz Pop").with_seed(99);
        let a = ProgressionGenerator::for_request(&request).generate(&request);
        let b = ProgressionGenerator::for_request(&request).generate(&request);
        assert_eq!(a, b);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, GenerationRequest::default());
        assert_eq!(request.form, "AABA");
        assert_eq!(request.style, "Jazz Pop");
        assert_eq!(request.complexity, Complexity::Medium);
    }

    #[test]
    fn test_section_areas_follow_form() {
        let form = Form::resolve("ABAC");
        let mut gen = pinned();
        let measures = gen.generate_measures(&form, &GenerationRequest::new("C", "ABAC", "Jazz Pop"));
        assert_eq!(form.sections[1].harmonic_area, HarmonicArea::Subdominant);
        // First subdominant template opens with IV7(11+)
        assert_eq!(measures[8].chord.symbol, "F7");
    }
}
