use tracing::debug;

use crate::domain::BuildingModel;

/// Enable zone, system and plant sizing plus sizing-period runs so the next
/// solve re-sizes whatever a measure changed.
pub fn mark_for_sizing(model: &mut BuildingModel) {
    let control = &mut model.simulation_control;
    control.do_zone_sizing = true;
    control.do_system_sizing = true;
    control.do_plant_sizing = true;
    control.run_sizing_periods = true;
    debug!(model = %model.name, "sizing enabled");
}
