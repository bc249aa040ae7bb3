//! Domestic hot water: swap a loop's water heaters for a heat pump water
//! heater.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    BuildingModel, EquipmentRole, HeatPumpType, Power, Schedule, SupplyComponent, Temperature,
    Thermostat, Volume, WaterHeatingUnit,
};
use crate::error::{EntityKind, Result, RetrofitError};
use crate::units::{self, UnitConverter, CELSIUS, FAHRENHEIT, GALLON, M3};

pub const DEFAULT_SETPOINT_SCHEDULE: &str = "Service Water Heating Setpoint";
pub const TANK_ZONE_HEATING_SCHEDULE: &str = "Tank Zone Heating Setpoint";
pub const TANK_ZONE_COOLING_SCHEDULE: &str = "Tank Zone Cooling Setpoint";

/// Sizing inputs for the replacement heat pump water heater.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WaterHeaterSizing {
    /// Substring of the plant loop name (case-sensitive).
    #[validate(length(min = 1))]
    pub loop_pattern: String,
    /// Case-insensitive substring of the zone that houses the tank.
    #[validate(length(min = 1))]
    pub tank_zone_pattern: String,
    pub heat_pump_type: HeatPumpType,
    /// Requested thermal output, kW.
    #[validate(range(exclusive_min = 0.0))]
    pub capacity_kw: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub cop: f64,
    #[validate(range(min = 0.0))]
    pub backup_kw: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub volume_gal: f64,
    pub service_water_temperature_f: f64,
    #[validate(range(min = 0.0))]
    pub parasitic_w: f64,
    /// Setpoints for the tank zone; lowered so the heat pump's cooling
    /// effect does not drive up space heating.
    pub tank_zone_heating_setpoint_c: f64,
    pub tank_zone_cooling_setpoint_c: f64,
}

impl Default for WaterHeaterSizing {
    fn default() -> Self {
        Self {
            loop_pattern: "DHW".to_string(),
            tank_zone_pattern: "corridor".to_string(),
            heat_pump_type: HeatPumpType::WrappedCondenser,
            capacity_kw: 40.0,
            cop: 2.2,
            backup_kw: 5.0,
            volume_gal: 250.0,
            service_water_temperature_f: 125.0,
            parasitic_w: 3.0,
            tank_zone_heating_setpoint_c: 15.6,
            tank_zone_cooling_setpoint_c: 23.0,
        }
    }
}

impl WaterHeaterSizing {
    /// Heat pump rated capacity: `capacity_kW × 1000 / COP`.
    pub fn rated_capacity(&self) -> Power {
        Power::watts(self.capacity_kw * 1000.0 / self.cop)
    }

    pub fn backup_capacity(&self) -> Power {
        Power::watts(self.backup_kw * 1000.0)
    }
}

/// Build the replacement unit. `None` when the sizing does not describe a
/// physical unit (zero COP, empty tank, ...).
pub fn build_heat_pump_water_heater(
    sizing: &WaterHeaterSizing,
    tank_volume: Volume,
    service_water_temperature: Temperature,
    setpoint_schedule: Uuid,
    thermal_zone: Uuid,
) -> Option<WaterHeatingUnit> {
    let rated_capacity = sizing.rated_capacity();
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(rated_capacity.as_watts()) || !positive(tank_volume.as_cubic_metres()) || !positive(sizing.cop) {
        return None;
    }
    Some(WaterHeatingUnit {
        id: Uuid::new_v4(),
        name: format!("{:.0}gal Heat Pump Water Heater", sizing.volume_gal),
        heat_pump_type: sizing.heat_pump_type,
        rated_capacity,
        backup_capacity: sizing.backup_capacity(),
        cop: sizing.cop,
        tank_volume,
        service_water_temperature,
        setpoint_schedule: Some(setpoint_schedule),
        on_cycle_parasitic: Power::watts(sizing.parasitic_w),
        off_cycle_parasitic: Power::watts(sizing.parasitic_w),
        thermal_zone: Some(thermal_zone),
    })
}

/// Replace the water heaters on the matching loop.
///
/// Lookups and unit conversions happen before anything is removed, so a
/// missing loop or zone leaves the model untouched. A construction failure
/// after removal leaves the loop without water heating and is reported as
/// [`RetrofitError::ConstructionFailed`].
pub fn replace_water_heating(
    model: &mut BuildingModel,
    sizing: &WaterHeaterSizing,
    units: &dyn UnitConverter,
) -> Result<WaterHeatingUnit> {
    let tank_volume = Volume::cubic_metres(units::convert(units, sizing.volume_gal, GALLON, M3)?);
    let service_temp = Temperature::celsius(units::convert(
        units,
        sizing.service_water_temperature_f,
        FAHRENHEIT,
        CELSIUS,
    )?);

    let loop_idx = model
        .plant_loops()
        .iter()
        .position(|l| l.name.contains(&sizing.loop_pattern))
        .ok_or_else(|| RetrofitError::RequiredEntityNotFound {
            kind: EntityKind::PlantLoop,
            pattern: sizing.loop_pattern.clone(),
        })?;

    let tank_zone_pattern = sizing.tank_zone_pattern.to_lowercase();
    let zone_idx = model
        .zones()
        .iter()
        .position(|z| z.name.to_lowercase().contains(&tank_zone_pattern))
        .ok_or_else(|| RetrofitError::RequiredEntityNotFound {
            kind: EntityKind::ThermalZone,
            pattern: sizing.tank_zone_pattern.clone(),
        })?;

    // First captured setpoint schedule wins.
    let mut captured: Option<Uuid> = None;
    let plant_loop = &mut model.plant_loops_mut()[loop_idx];
    plant_loop.supply_components.retain(|c| {
        if c.role() != Some(EquipmentRole::WaterHeating) {
            return true;
        }
        if captured.is_none() {
            captured = c.setpoint_schedule();
        }
        debug!(component = %c.name(), "removing water heater");
        false
    });
    let loop_name = plant_loop.name.clone();

    let schedule = match captured {
        Some(id) => id,
        None => {
            warn!(loop_name = %loop_name, "no setpoint schedule to reuse, creating one");
            model.add_schedule(Schedule::all_day(DEFAULT_SETPOINT_SCHEDULE, service_temp.as_celsius()))
        }
    };

    let heating =
        model.set_all_day_schedule(TANK_ZONE_HEATING_SCHEDULE, sizing.tank_zone_heating_setpoint_c);
    let cooling =
        model.set_all_day_schedule(TANK_ZONE_COOLING_SCHEDULE, sizing.tank_zone_cooling_setpoint_c);
    let zone = &mut model.zones_mut()[zone_idx];
    zone.thermostat = Some(Thermostat {
        heating_setpoint: heating,
        cooling_setpoint: cooling,
    });
    let zone_id = zone.id;

    let unit = build_heat_pump_water_heater(sizing, tank_volume, service_temp, schedule, zone_id)
        .ok_or_else(|| RetrofitError::ConstructionFailed("heat pump water heater".to_string()))?;

    model.plant_loops_mut()[loop_idx]
        .add_to_supply_inlet(SupplyComponent::WaterHeaterHeatPump(unit.clone()));

    info!(
        loop_name = %loop_name,
        unit = %unit.name,
        rated_capacity = %unit.rated_capacity,
        "installed heat pump water heater"
    );
    Ok(unit)
}
