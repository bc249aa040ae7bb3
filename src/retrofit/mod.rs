//! Model edits behind the measures.
//!
//! Every function here takes the model by `&mut` and returns a count or the
//! created equipment. None of them send user-facing messages; that is the
//! measure layer's job.

pub mod boiler;
pub mod curves;
pub mod envelope;
pub mod finalize;
pub mod plant;
pub mod terminal;
pub mod ventilation;
pub mod zones;

pub use boiler::{upgrade_boilers, CONDENSING_BOILER_EFFICIENCY};
pub use curves::{curve_set, curve_set_for, CurveRole, CurveSet, RatedCops, Technology};
pub use envelope::{
    apply_opaque_insulation, replace_window_construction, set_infiltration_rate,
    set_window_glazing, GlazingProperty, InfiltrationResult, InsulationResult, OpaqueTarget,
};
pub use finalize::mark_for_sizing;
pub use plant::{replace_water_heating, WaterHeaterSizing};
pub use terminal::build_terminal_unit;
pub use ventilation::{install_sized_ventilation, install_ventilation, VentilationSizing, VentilationSpec};
pub use zones::{apply_technology, apply_to_zones};
