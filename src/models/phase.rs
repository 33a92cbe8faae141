use serde::{Deserialize, Serialize};

pub const REST_SCALE: f64 = 1.0;
pub const INHALED_SCALE: f64 = 1.3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Inhale,
    Exhale,
    Hold,
}

impl PhaseKind {
    /// Name sent to the backend for this kind.
    pub fn wire_name(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => "inspire",
            PhaseKind::Exhale => "expire",
            PhaseKind::Hold => "pause",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => "Inspiration",
            PhaseKind::Exhale => "Expiration",
            PhaseKind::Hold => "Pause",
        }
    }

    /// Instruction shown when a phase carries none of its own.
    pub fn default_instruction(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => {
                "Inspirez profondément par le nez, sentez votre poitrine se gonfler"
            }
            PhaseKind::Exhale => "Expirez lentement par la bouche, relâchez toute tension",
            PhaseKind::Hold => "Pause, restez calme et détendu, observez votre respiration",
        }
    }

    /// Circle size reached once a phase of this kind has fully elapsed,
    /// given the size it started from.
    pub fn terminal_scale(&self, start_scale: f64) -> f64 {
        match self {
            PhaseKind::Inhale => INHALED_SCALE,
            PhaseKind::Exhale => REST_SCALE,
            PhaseKind::Hold => start_scale,
        }
    }

    /// Where the circle sits before the first phase: the opposite endpoint
    /// of the direction an inhale moves, so an opening inhale has room to grow.
    pub fn opening_scale(&self) -> f64 {
        match self {
            PhaseKind::Inhale => REST_SCALE,
            PhaseKind::Exhale | PhaseKind::Hold => INHALED_SCALE,
        }
    }
}

/// Canonical phase used throughout playback.
///
/// `duration_seconds` is kept signed so values coming off the wire are
/// carried verbatim; the session engine rejects anything non-positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_seconds: i64,
    #[serde(default)]
    pub instruction: String,
}

impl Phase {
    pub fn new(kind: PhaseKind, duration_seconds: i64) -> Self {
        Self {
            kind,
            duration_seconds,
            instruction: String::new(),
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn display_instruction(&self) -> &str {
        if self.instruction.trim().is_empty() {
            self.kind.default_instruction()
        } else {
            &self.instruction
        }
    }
}

/// Phase as exchanged with the REST backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WirePhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

impl WirePhase {
    pub fn named(name: impl Into<String>, duration_seconds: i64) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_scale_follows_direction() {
        assert_eq!(PhaseKind::Inhale.terminal_scale(1.0), INHALED_SCALE);
        assert_eq!(PhaseKind::Exhale.terminal_scale(1.3), REST_SCALE);
        assert_eq!(PhaseKind::Hold.terminal_scale(1.15), 1.15);
    }

    #[test]
    fn empty_instruction_falls_back_to_kind_default() {
        let phase = Phase::new(PhaseKind::Exhale, 4).with_instruction("   ");
        assert_eq!(
            phase.display_instruction(),
            PhaseKind::Exhale.default_instruction()
        );

        let phase = Phase::new(PhaseKind::Exhale, 4).with_instruction("Soufflez");
        assert_eq!(phase.display_instruction(), "Soufflez");
    }

    #[test]
    fn wire_phase_accepts_missing_optional_fields() {
        let phase: WirePhase =
            serde_json::from_str(r#"{"name":"Inspiration","durationSeconds":5}"#).unwrap();
        assert_eq!(phase.name, "Inspiration");
        assert_eq!(phase.duration_seconds, 5);
        assert!(phase.order_index.is_none());
        assert!(phase.instruction.is_none());
    }
}
