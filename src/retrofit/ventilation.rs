//! Balanced in-unit ventilation with heat recovery (ERV).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    BuildingModel, ConstantVolumeFan, Effectiveness, EquipmentRole, HeatExchanger, Pressure,
    ThermalZone, VentilationUnit, VolumeFlow, ZoneEquipment,
};
use crate::error::Result;
use crate::units::{self, UnitConverter, CFM, M3_PER_S};

/// Sizing of the ventilator installed in each matching zone.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VentilationSpec {
    /// Case-insensitive substring a zone name must contain.
    #[validate(length(min = 1))]
    pub zone_pattern: String,
    #[validate(range(min = 1.0))]
    pub flow_cfm: f64,
    /// Fan power target per fan, W/cfm.
    #[validate(range(min = 0.0))]
    pub power_per_cfm: f64,
    #[validate(range(min = 0.01, max = 1.0))]
    pub fan_efficiency: f64,
    pub effectiveness: Effectiveness,
}

impl Default for VentilationSpec {
    fn default() -> Self {
        Self {
            zone_pattern: "apartment".to_string(),
            flow_cfm: 75.0,
            power_per_cfm: 0.5,
            fan_efficiency: 0.5,
            effectiveness: Effectiveness::default(),
        }
    }
}

/// Fan pressure rise that hits the power-per-flow target:
/// `(flow_cfm × W/cfm × efficiency) / flow_m³/s`.
pub fn fan_pressure_rise(
    flow_cfm: f64,
    power_per_cfm: f64,
    fan_efficiency: f64,
    flow: VolumeFlow,
) -> Pressure {
    let target_power_w = flow_cfm * power_per_cfm;
    Pressure::pascals(target_power_w * fan_efficiency / flow.as_cubic_metres_per_second())
}

pub fn matches_pattern(zone: &ThermalZone, pattern: &str) -> bool {
    zone.name.to_lowercase().contains(&pattern.to_lowercase())
}

fn has_ventilator(zone: &ThermalZone) -> bool {
    zone.equipment
        .iter()
        .any(|e| e.role() == EquipmentRole::Ventilation)
}

/// Flow and fan pressure rise resolved from a [`VentilationSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VentilationSizing {
    pub flow: VolumeFlow,
    pub pressure_rise: Pressure,
}

impl VentilationSpec {
    /// Resolve the SI flow and pressure rise. Fails only on the unit conversion.
    pub fn size(&self, units: &dyn UnitConverter) -> Result<VentilationSizing> {
        let flow = VolumeFlow::cubic_metres_per_second(units::convert(units, self.flow_cfm, CFM, M3_PER_S)?);
        Ok(VentilationSizing {
            flow,
            pressure_rise: fan_pressure_rise(self.flow_cfm, self.power_per_cfm, self.fan_efficiency, flow),
        })
    }
}

/// Add one ventilator to every matching zone that does not already hold one.
/// Returns the number of ventilators added; a second run adds none.
pub fn install_ventilation(
    model: &mut BuildingModel,
    spec: &VentilationSpec,
    units: &dyn UnitConverter,
) -> Result<usize> {
    let sizing = spec.size(units)?;
    Ok(install_sized_ventilation(model, spec, sizing))
}

/// [`install_ventilation`] with the sizing already resolved, for callers that
/// must finish every fallible step before editing the model.
pub fn install_sized_ventilation(
    model: &mut BuildingModel,
    spec: &VentilationSpec,
    sizing: VentilationSizing,
) -> usize {
    let VentilationSizing { flow, pressure_rise } = sizing;

    let targets: Vec<usize> = model
        .zones()
        .iter()
        .enumerate()
        .filter(|(_, z)| matches_pattern(z, &spec.zone_pattern) && !has_ventilator(z))
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        debug!(pattern = %spec.zone_pattern, "no zones need a ventilator");
        return 0;
    }

    let always_on = model.always_on_discrete_schedule();
    let fan = |name: String| ConstantVolumeFan {
        name,
        fan_efficiency: spec.fan_efficiency,
        pressure_rise,
        availability: always_on,
    };

    for &i in &targets {
        let zone = &mut model.zones_mut()[i];
        let unit = VentilationUnit {
            id: Uuid::new_v4(),
            name: format!("ERV - {}", zone.name),
            availability: always_on,
            supply_air_flow_rate: flow,
            exhaust_air_flow_rate: flow,
            supply_fan: fan(format!("ERV Supply Fan - {}", zone.name)),
            exhaust_fan: fan(format!("ERV Exhaust Fan - {}", zone.name)),
            heat_exchanger: HeatExchanger {
                name: format!("ERV Heat Exchanger - {}", zone.name),
                effectiveness: spec.effectiveness,
            },
        };
        debug!(zone = %zone.name, %flow, %pressure_rise, "adding ventilator");
        zone.equipment.push(ZoneEquipment::EnergyRecoveryVentilator(unit));
    }

    info!(installed = targets.len(), "ventilation install complete");
    targets.len()
}
