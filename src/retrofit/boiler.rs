use tracing::{debug, info};

use crate::domain::{BuildingModel, SupplyComponent};

/// Nominal thermal efficiency of a condensing hot-water boiler.
pub const CONDENSING_BOILER_EFFICIENCY: f64 = 0.92;

/// Set every hot-water boiler's nominal efficiency. Returns the number of
/// boilers changed.
pub fn upgrade_boilers(model: &mut BuildingModel, efficiency: f64) -> usize {
    let mut upgraded = 0;
    for component in model
        .plant_loops_mut()
        .iter_mut()
        .flat_map(|l| l.supply_components.iter_mut())
    {
        if let SupplyComponent::BoilerHotWater(boiler) = component {
            debug!(
                boiler = %boiler.name,
                from = boiler.nominal_thermal_efficiency,
                to = efficiency,
                "upgrading boiler"
            );
            boiler.nominal_thermal_efficiency = efficiency;
            upgraded += 1;
        }
    }
    info!(upgraded, efficiency, "boiler upgrade complete");
    upgraded
}
