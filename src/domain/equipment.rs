//! Zone-level HVAC equipment.
//!
//! Every piece of equipment a zone can hold is a variant of [`ZoneEquipment`],
//! so role checks (is there already a ventilator here?) are exhaustive matches
//! instead of runtime type probing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::Schedule;
use super::types::{Power, Pressure, VolumeFlow};

/// Role an equipment item plays in the building.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentRole {
    Conditioning,
    Ventilation,
    WaterHeating,
}

impl std::fmt::Display for EquipmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentRole::Conditioning => write!(f, "conditioning"),
            EquipmentRole::Ventilation => write!(f, "ventilation"),
            EquipmentRole::WaterHeating => write!(f, "water heating"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneEquipment {
    PackagedTerminalHeatPump(TerminalUnit),
    EnergyRecoveryVentilator(VentilationUnit),
    Baseboard(Baseboard),
    WindowAirConditioner(WindowAirConditioner),
}

impl ZoneEquipment {
    pub fn role(&self) -> EquipmentRole {
        match self {
            ZoneEquipment::PackagedTerminalHeatPump(_)
            | ZoneEquipment::Baseboard(_)
            | ZoneEquipment::WindowAirConditioner(_) => EquipmentRole::Conditioning,
            ZoneEquipment::EnergyRecoveryVentilator(_) => EquipmentRole::Ventilation,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ZoneEquipment::PackagedTerminalHeatPump(u) => &u.name,
            ZoneEquipment::EnergyRecoveryVentilator(u) => &u.name,
            ZoneEquipment::Baseboard(b) => &b.name,
            ZoneEquipment::WindowAirConditioner(w) => &w.name,
        }
    }

    /// Curve ids referenced by this item.
    pub fn curve_refs(&self) -> Vec<Uuid> {
        match self {
            ZoneEquipment::PackagedTerminalHeatPump(u) => u.curve_refs(),
            ZoneEquipment::EnergyRecoveryVentilator(_)
            | ZoneEquipment::Baseboard(_)
            | ZoneEquipment::WindowAirConditioner(_) => Vec::new(),
        }
    }
}

// ============================================================================
// Packaged terminal heat pump
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnOffFan {
    pub name: String,
    pub maximum_flow_rate: VolumeFlow,
    pub motor_efficiency: f64,
    pub fan_efficiency: f64,
    pub pressure_rise: Pressure,
}

/// Single-speed DX coil. The three curve references are, in order,
/// capacity f(T), EIR f(T) and EIR f(PLR).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DxCoil {
    pub name: String,
    pub capacity_curve: Uuid,
    pub eir_curve: Uuid,
    pub part_load_curve: Uuid,
    pub rated_cop: f64,
}

/// Electric resistance coil. `None` capacity means autosized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricCoil {
    pub name: String,
    pub nominal_capacity: Option<Power>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalUnit {
    pub id: Uuid,
    pub name: String,
    pub availability: Schedule,
    pub fan: OnOffFan,
    pub cooling_coil: DxCoil,
    pub heating_coil: DxCoil,
    pub supplemental_heating_coil: ElectricCoil,
}

impl TerminalUnit {
    pub fn curve_refs(&self) -> Vec<Uuid> {
        [&self.cooling_coil, &self.heating_coil]
            .iter()
            .flat_map(|c| [c.capacity_curve, c.eir_curve, c.part_load_curve])
            .collect()
    }
}

// ============================================================================
// Energy recovery ventilator
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantVolumeFan {
    pub name: String,
    pub fan_efficiency: f64,
    pub pressure_rise: Pressure,
    pub availability: Uuid,
}

/// Heat exchanger effectiveness at 100% air flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Effectiveness {
    pub sensible_heating: f64,
    pub sensible_cooling: f64,
    pub latent_heating: f64,
    pub latent_cooling: f64,
}

impl Effectiveness {
    pub fn uniform(sensible: f64, latent: f64) -> Self {
        Self {
            sensible_heating: sensible,
            sensible_cooling: sensible,
            latent_heating: latent,
            latent_cooling: latent,
        }
    }
}

impl Default for Effectiveness {
    fn default() -> Self {
        Self::uniform(0.75, 0.50)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatExchanger {
    pub name: String,
    pub effectiveness: Effectiveness,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VentilationUnit {
    pub id: Uuid,
    pub name: String,
    pub availability: Uuid,
    pub supply_air_flow_rate: VolumeFlow,
    pub exhaust_air_flow_rate: VolumeFlow,
    pub supply_fan: ConstantVolumeFan,
    pub exhaust_fan: ConstantVolumeFan,
    pub heat_exchanger: HeatExchanger,
}

// ============================================================================
// Baseline equipment found in seed models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Baseboard {
    pub name: String,
    pub hot_water: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowAirConditioner {
    pub name: String,
    pub rated_cop: f64,
}
