use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::equipment::EquipmentRole;
use super::types::{Power, Temperature, Volume};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantLoop {
    pub id: Uuid,
    pub name: String,
    /// Supply-side components in flow order; index 0 sits at the supply inlet.
    pub supply_components: Vec<SupplyComponent>,
}

impl PlantLoop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            supply_components: Vec::new(),
        }
    }

    pub fn add_to_supply_inlet(&mut self, component: SupplyComponent) {
        self.supply_components.insert(0, component);
    }

    pub fn water_heaters(&self) -> impl Iterator<Item = &SupplyComponent> {
        self.supply_components
            .iter()
            .filter(|c| c.role() == Some(EquipmentRole::WaterHeating))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupplyComponent {
    WaterHeaterMixed(WaterHeaterMixed),
    WaterHeaterHeatPump(WaterHeatingUnit),
    BoilerHotWater(BoilerHotWater),
    Pump(Pump),
    Pipe(Pipe),
}

impl SupplyComponent {
    /// Equipment role, if the component is equipment at all.
    pub fn role(&self) -> Option<EquipmentRole> {
        match self {
            SupplyComponent::WaterHeaterMixed(_) | SupplyComponent::WaterHeaterHeatPump(_) => {
                Some(EquipmentRole::WaterHeating)
            }
            SupplyComponent::BoilerHotWater(_) => Some(EquipmentRole::Conditioning),
            SupplyComponent::Pump(_) | SupplyComponent::Pipe(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SupplyComponent::WaterHeaterMixed(w) => &w.name,
            SupplyComponent::WaterHeaterHeatPump(w) => &w.name,
            SupplyComponent::BoilerHotWater(b) => &b.name,
            SupplyComponent::Pump(p) => &p.name,
            SupplyComponent::Pipe(p) => &p.name,
        }
    }

    /// Setpoint schedule of a water-heating component.
    pub fn setpoint_schedule(&self) -> Option<Uuid> {
        match self {
            SupplyComponent::WaterHeaterMixed(w) => w.setpoint_schedule,
            SupplyComponent::WaterHeaterHeatPump(w) => w.setpoint_schedule,
            SupplyComponent::BoilerHotWater(_)
            | SupplyComponent::Pump(_)
            | SupplyComponent::Pipe(_) => None,
        }
    }
}

/// Conventional storage water heater.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterHeaterMixed {
    pub name: String,
    pub tank_volume: Volume,
    pub heater_capacity: Power,
    pub fuel: String,
    pub setpoint_schedule: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeatPumpType {
    WrappedCondenser,
    PumpedCondenser,
}

impl std::fmt::Display for HeatPumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeatPumpType::WrappedCondenser => write!(f, "WrappedCondenser"),
            HeatPumpType::PumpedCondenser => write!(f, "PumpedCondenser"),
        }
    }
}

/// Heat pump water heater: a tank heated by a heat pump with an electric
/// backup element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterHeatingUnit {
    pub id: Uuid,
    pub name: String,
    pub heat_pump_type: HeatPumpType,
    pub rated_capacity: Power,
    pub backup_capacity: Power,
    pub cop: f64,
    pub tank_volume: Volume,
    pub service_water_temperature: Temperature,
    pub setpoint_schedule: Option<Uuid>,
    pub on_cycle_parasitic: Power,
    pub off_cycle_parasitic: Power,
    /// Zone the tank and its evaporator sit in.
    pub thermal_zone: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoilerHotWater {
    pub name: String,
    pub nominal_thermal_efficiency: f64,
    pub fuel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pump {
    pub name: String,
    pub variable_speed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipe {
    pub name: String,
}
