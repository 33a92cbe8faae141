pub mod mapper;

pub use mapper::{
    canonical_to_wire, classify_phase_name, classify_phase_name_detailed, map_sequence,
    map_sequence_with_diagnostics, unmap_sequence, wire_to_canonical, Classification,
    MappedPhases, UnrecognizedPhaseName,
};
