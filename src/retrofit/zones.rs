//! Zone retrofit: replace every conditioned zone's equipment with a new
//! packaged terminal heat pump.

use tracing::{debug, info};

use crate::domain::{BuildingModel, ZoneEquipment};
use crate::error::Result;

use super::curves::{curve_set, CurveSet, RatedCops, Technology};
use super::terminal::build_terminal_unit;

/// Install `technology` with its library curves and rated COPs.
pub fn apply_technology(model: &mut BuildingModel, technology: Technology) -> Result<usize> {
    apply_to_zones(model, curve_set(technology)?, technology.rated_cops())
}

/// Destroy-then-recreate over every zone that has spaces. Returns the number
/// of zones modified.
///
/// The curve set is checked before any zone is touched, so an incomplete set
/// leaves the model unchanged. Running this twice yields one unit per
/// eligible zone, never two.
pub fn apply_to_zones(model: &mut BuildingModel, curves: &CurveSet, cops: RatedCops) -> Result<usize> {
    curves.ensure_complete()?;

    for (_, curve) in curves.curves() {
        model.add_curve(curve);
    }

    let mut zones_modified = 0;
    for zone in model.zones_mut() {
        if zone.spaces.is_empty() {
            debug!(zone = %zone.name, "skipping zone without spaces");
            continue;
        }

        let unit = build_terminal_unit(curves, cops, &zone.name)?;

        let removed = zone.equipment.len();
        zone.equipment.clear();
        zone.equipment.push(ZoneEquipment::PackagedTerminalHeatPump(unit));

        debug!(zone = %zone.name, removed, "installed terminal unit");
        zones_modified += 1;
    }

    let purged = model.purge_unused_curves();
    info!(
        technology = %curves.technology,
        zones_modified,
        purged_curves = purged,
        "zone retrofit complete"
    );
    Ok(zones_modified)
}
