// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song forms and their sections.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::HarmonicArea;

/// Form used when a requested name is unknown
pub const DEFAULT_FORM: &str = "AABA";

const FORMS: &[(&str, &[(&str, u32, HarmonicArea)])] = &[
    (
        "AABA",
        &[
            ("A1", 8, HarmonicArea::Tonic),
            ("A2", 8, HarmonicArea::Tonic),
            ("B", 8, HarmonicArea::Bridge),
            ("A3", 8, HarmonicArea::Tonic),
        ],
    ),
    (
        "ABAC",
        &[
            ("A1", 8, HarmonicArea::Tonic),
            ("B", 8, HarmonicArea::Subdominant),
            ("A2", 8, HarmonicArea::Tonic),
            ("C", 8, HarmonicArea::Bridge),
        ],
    ),
    (
        "16 bars",
        &[("A", 8, HarmonicArea::Tonic), ("B", 8, HarmonicArea::Bridge)],
    ),
    (
        "32 bars",
        &[("A", 16, HarmonicArea::Tonic), ("B", 16, HarmonicArea::Bridge)],
    ),
];

/// A section of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub measures: u32,
    pub harmonic_area: HarmonicArea,
}

/// A resolved song form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    /// Name as requested
    pub name: String,
    pub sections: Vec<Section>,
    pub total_measures: u32,
}

impl Form {
    /// Resolve a form by name, falling back to AABA for unknown names
    pub fn resolve(name: &str) -> Self {
        let sections = match lookup(name) {
            Some(sections) => sections,
            None => {
                debug!(form = name, fallback = DEFAULT_FORM, "unknown form");
                lookup(DEFAULT_FORM).unwrap_or_default()
            }
        };

        let sections: Vec<Section> = sections
            .iter()
            .map(|&(section, measures, harmonic_area)| Section {
                name: section.to_string(),
                measures,
                harmonic_area,
            })
            .collect();

        Self {
            name: name.to_string(),
            total_measures: sections.iter().map(|s| s.measures).sum(),
            sections,
        }
    }

    /// Sections paired with their 0-based starting measure offset
    pub fn sections_with_offsets(&self) -> impl Iterator<Item = (u32, &Section)> {
        self.sections.iter().scan(0u32, |start, section| {
            let offset = *start;
            *start += section.measures;
            Some((offset, section))
        })
    }
}

fn lookup(name: &str) -> Option<&'static [(&'static str, u32, HarmonicArea)]> {
    FORMS
        .iter()
        .find(|(form, _)| *form == name)
        .map(|(_, sections)| *sections)
}

/// Whether a form name is known (no fallback)
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Known form names, in declaration order
pub fn available_forms() -> Vec<&'static str> {
    FORMS.iter().map(|(name, _)| *name).collect()
}
