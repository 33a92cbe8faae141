//! Exercise data models.
//!
//! `WireExercise` is what the backend sends; `Exercise` is the snapshot the
//! session engine plays; `ExerciseDraft` is the create/update payload.

use serde::{Deserialize, Serialize};

use crate::phases::{map_sequence, unmap_sequence};

use super::phase::{Phase, WirePhase};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub is_professional: bool,
}

impl Exercise {
    /// Sum of all phase durations, saturating. Derived, never stored.
    pub fn total_duration_seconds(&self) -> i64 {
        saturating_total(self.phases.iter().map(|phase| phase.duration_seconds))
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireExercise {
    pub id: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phases: Vec<WirePhase>,
    #[serde(default)]
    pub is_professional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<i64>,
}

impl WireExercise {
    /// Normalize the backend representation into a playable snapshot.
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            id: self.id,
            label: self.label,
            description: self.description,
            phases: map_sequence(&self.phases),
            is_professional: self.is_professional.unwrap_or(false),
        }
    }

    /// Duration to advertise in listings: the phase sum when phases are
    /// present, otherwise whatever estimate the backend supplied.
    pub fn listed_duration_seconds(&self) -> i64 {
        if self.phases.is_empty() {
            self.estimated_duration.unwrap_or(0)
        } else {
            saturating_total(self.phases.iter().map(|phase| phase.duration_seconds))
        }
    }
}

fn saturating_total(durations: impl Iterator<Item = i64>) -> i64 {
    durations.fold(0i64, |total, seconds| total.saturating_add(seconds))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDraft {
    pub label: String,
    pub description: String,
    pub phases: Vec<WirePhase>,
}

impl ExerciseDraft {
    pub fn new(label: impl Into<String>, description: impl Into<String>, phases: &[Phase]) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            phases: unmap_sequence(phases),
        }
    }

    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self::new(
            exercise.label.clone(),
            exercise.description.clone(),
            &exercise.phases,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::phase::PhaseKind;

    #[test]
    fn wire_exercise_maps_phases_and_defaults_professional_flag() {
        let raw = r#"{
            "id": 7,
            "label": "Carré",
            "description": "4-4-4-4",
            "phases": [
                {"id": 1, "name": "Inspiration", "durationSeconds": 4, "orderIndex": 1},
                {"id": 2, "name": "Rétention", "durationSeconds": 4, "orderIndex": 2},
                {"id": 3, "name": "Expiration", "durationSeconds": 4, "instruction": "Lentement"}
            ]
        }"#;
        let wire: WireExercise = serde_json::from_str(raw).unwrap();
        let exercise = wire.into_exercise();

        assert!(!exercise.is_professional);
        assert_eq!(exercise.total_duration_seconds(), 12);
        let kinds: Vec<_> = exercise.phases.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PhaseKind::Inhale, PhaseKind::Hold, PhaseKind::Exhale]
        );
        assert_eq!(exercise.phases[2].instruction, "Lentement");
        assert_eq!(exercise.phases[0].instruction, "");
    }

    #[test]
    fn huge_durations_saturate_instead_of_overflowing() {
        let wire = WireExercise {
            id: 9,
            phases: vec![
                WirePhase::named("inspire", i64::MAX),
                WirePhase::named("expire", 1),
            ],
            ..WireExercise::default()
        };
        assert_eq!(wire.listed_duration_seconds(), i64::MAX);
        assert_eq!(wire.into_exercise().total_duration_seconds(), i64::MAX);
    }

    #[test]
    fn listed_duration_uses_estimate_without_phases() {
        let wire = WireExercise {
            id: 1,
            estimated_duration: Some(300),
            ..WireExercise::default()
        };
        assert_eq!(wire.listed_duration_seconds(), 300);
    }

    #[test]
    fn draft_serializes_one_based_order() {
        let phases = vec![
            Phase::new(PhaseKind::Inhale, 4),
            Phase::new(PhaseKind::Exhale, 6),
        ];
        let draft = ExerciseDraft::new("Calme", "", &phases);
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["phases"][0]["name"], "inspire");
        assert_eq!(json["phases"][0]["orderIndex"], 1);
        assert_eq!(json["phases"][1]["name"], "expire");
        assert_eq!(json["phases"][1]["orderIndex"], 2);
        assert_eq!(json["phases"][1]["instruction"], "");
        assert!(json["phases"][1].get("id").is_none());
    }
}
