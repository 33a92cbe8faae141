//! Translation between backend phase records and canonical phases.
//!
//! Every function here is total. Phase data comes from a server this client
//! does not control, so unexpected names degrade to [`PhaseKind::Hold`] and
//! are reported on the `cesizen::phases::unrecognized` log target instead of
//! failing.

use serde::Serialize;

use crate::{
    log_debug,
    models::{Phase, PhaseKind, WirePhase},
};

const ENABLE_LOGS: bool = true;

pub const UNRECOGNIZED_TARGET: &str = "cesizen::phases::unrecognized";

const INHALE_MARKERS: &[&str] = &["inspir", "inhal"];
const EXHALE_MARKERS: &[&str] = &["expir", "exhal"];
const HOLD_MARKERS: &[&str] = &["pause", "hold", "retention", "rétention"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: PhaseKind,
    /// `false` when no marker matched and `kind` is the Hold fallback.
    pub recognized: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedPhaseName {
    pub position: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedPhases {
    pub phases: Vec<Phase>,
    pub unrecognized: Vec<UnrecognizedPhaseName>,
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}

/// Classify a free-text phase name without emitting diagnostics.
///
/// Markers are checked inhale, then exhale, then hold, so overlapping names
/// such as `"inspiration-pause"` resolve deterministically.
pub fn classify_phase_name_detailed(name: &str) -> Classification {
    let normalized = name.trim().to_lowercase();

    let matched = if contains_any(&normalized, INHALE_MARKERS) {
        Some(PhaseKind::Inhale)
    } else if contains_any(&normalized, EXHALE_MARKERS) {
        Some(PhaseKind::Exhale)
    } else if contains_any(&normalized, HOLD_MARKERS) {
        Some(PhaseKind::Hold)
    } else {
        None
    };

    match matched {
        Some(kind) => Classification {
            kind,
            recognized: true,
        },
        None => Classification {
            kind: PhaseKind::Hold,
            recognized: false,
        },
    }
}

pub fn classify_phase_name(name: &str) -> PhaseKind {
    let classification = classify_phase_name_detailed(name);
    if !classification.recognized {
        report_unrecognized(name, None);
    }
    classification.kind
}

fn report_unrecognized(name: &str, position: Option<usize>) {
    match position {
        Some(position) => log::warn!(
            target: UNRECOGNIZED_TARGET,
            "unrecognized phase name {:?} at position {}; treating as hold",
            name,
            position + 1
        ),
        None => log::warn!(
            target: UNRECOGNIZED_TARGET,
            "unrecognized phase name {:?}; treating as hold",
            name
        ),
    }
}

pub fn wire_to_canonical(wire: &WirePhase) -> Phase {
    Phase {
        kind: classify_phase_name(&wire.name),
        duration_seconds: wire.duration_seconds,
        instruction: wire.instruction.clone().unwrap_or_default(),
    }
}

pub fn canonical_to_wire(phase: &Phase, position: usize) -> WirePhase {
    WirePhase {
        id: None,
        name: phase.kind.wire_name().to_string(),
        duration_seconds: phase.duration_seconds,
        order_index: Some(
            u32::try_from(position)
                .ok()
                .and_then(|index| index.checked_add(1))
                .unwrap_or(u32::MAX),
        ),
        instruction: Some(phase.instruction.clone()),
    }
}

pub fn map_sequence(wire_phases: &[WirePhase]) -> Vec<Phase> {
    map_sequence_with_diagnostics(wire_phases).phases
}

/// Element-wise mapping that also collects every name that fell back to Hold.
pub fn map_sequence_with_diagnostics(wire_phases: &[WirePhase]) -> MappedPhases {
    let mut mapped = MappedPhases {
        phases: Vec::with_capacity(wire_phases.len()),
        unrecognized: Vec::new(),
    };

    for (position, wire) in wire_phases.iter().enumerate() {
        let classification = classify_phase_name_detailed(&wire.name);
        if !classification.recognized {
            report_unrecognized(&wire.name, Some(position));
            mapped.unrecognized.push(UnrecognizedPhaseName {
                position,
                name: wire.name.clone(),
            });
        }
        mapped.phases.push(Phase {
            kind: classification.kind,
            duration_seconds: wire.duration_seconds,
            instruction: wire.instruction.clone().unwrap_or_default(),
        });
    }

    log_debug!(
        "mapped {} wire phases ({} unrecognized)",
        mapped.phases.len(),
        mapped.unrecognized.len()
    );
    mapped
}

pub fn unmap_sequence(phases: &[Phase]) -> Vec<WirePhase> {
    let wire: Vec<WirePhase> = phases
        .iter()
        .enumerate()
        .map(|(position, phase)| canonical_to_wire(phase, position))
        .collect();
    log_debug!("prepared {} phases for the backend", wire.len());
    wire
}
