// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cadence detection over a resolved progression.

use serde::{Deserialize, Serialize};

use super::{HarmonicFunction, MeasureEntry};

/// Strength reported for dominant to tonic motion
pub const AUTHENTIC_STRENGTH: f64 = 0.9;
/// Strength reported for subdominant to tonic motion
pub const PLAGAL_STRENGTH: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceType {
    Authentic,
    Plagal,
}

/// A detected cadence, located at the measure it resolves into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    pub measure: u32,
    #[serde(rename = "type")]
    pub cadence_type: CadenceType,
    pub strength: f64,
}

/// Scan consecutive measures for cadential function changes
pub fn analyze(measures: &[MeasureEntry]) -> Vec<Cadence> {
    measures
        .windows(2)
        .filter_map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let (cadence_type, strength) = match (from.chord.function, to.chord.function) {
                (HarmonicFunction::Dominant, HarmonicFunction::Tonic) => {
                    (CadenceType::Authentic, AUTHENTIC_STRENGTH)
                }
                (HarmonicFunction::Subdominant, HarmonicFunction::Tonic) => {
                    (CadenceType::Plagal, PLAGAL_STRENGTH)
                }
                _ => return None,
            };
            Some(Cadence {
                measure: to.measure,
                cadence_type,
                strength,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::ChordInfo;
    use crate::voicing::VoicingAssignment;

    fn measure(number: u32, function: HarmonicFunction) -> MeasureEntry {
        MeasureEntry {
            measure: number,
            chord: ChordInfo {
                symbol: "X".to_string(),
                notes: Vec::new(),
                function,
                tensions: Vec::new(),
            },
            voicing: VoicingAssignment::default(),
            dynamics: Default::default(),
            articulation: Default::default(),
        }
    }

    #[test]
    fn test_authentic_cadence() {
        let measures = [
            measure(1, HarmonicFunction::Dominant),
            measure(2, HarmonicFunction::Tonic),
        ];
        let cadences = analyze(&measures);
        assert_eq!(
            cadences,
            vec![Cadence {
                measure: 2,
                cadence_type: CadenceType::Authentic,
                strength: 0.9
            }]
        );
    }

    #[test]
    fn test_plagal_cadence() {
        let measures = [
            measure(5, HarmonicFunction::Subdominant),
            measure(6, HarmonicFunction::Tonic),
        ];
        let cadences = analyze(&measures);
        assert_eq!(cadences.len(), 1);
        assert_eq!(cadences[0].measure, 6);
        assert_eq!(cadences[0].cadence_type, CadenceType::Plagal);
        assert_eq!(cadences[0].strength, 0.7);
    }

    #[test]
    fn test_no_cadence() {
        let tonic = [
            measure(1, HarmonicFunction::Tonic),
            measure(2, HarmonicFunction::Tonic),
        ];
        assert!(analyze(&tonic).is_empty());

        let away = [
            measure(1, HarmonicFunction::Tonic),
            measure(2, HarmonicFunction::Dominant),
            measure(3, HarmonicFunction::Subdominant),
        ];
        assert!(analyze(&away).is_empty());

        assert!(analyze(&[]).is_empty());
        assert!(analyze(&[measure(1, HarmonicFunction::Dominant)]).is_empty());
    }

    #[test]
    fn test_cadences_in_measure_order() {
        let measures = [
            measure(1, HarmonicFunction::Subdominant),
            measure(2, HarmonicFunction::Tonic),
            measure(3, HarmonicFunction::Dominant),
            measure(4, HarmonicFunction::Tonic),
        ];
        let cadences = analyze(&measures);
        let found: Vec<_> = cadences.iter().map(|c| (c.measure, c.cadence_type)).collect();
        assert_eq!(
            found,
            [(2, CadenceType::Plagal), (4, CadenceType::Authentic)]
        );
    }

    #[test]
    fn test_cadence_serializes_type_field() {
        let cadence = Cadence {
            measure: 4,
            cadence_type: CadenceType::Authentic,
            strength: 0.9,
        };
        let json = serde_json::to_string(&cadence).unwrap();
        assert_eq!(json, r#"{"measure":4,"type":"authentic","strength":0.9}"#);
    }
}
