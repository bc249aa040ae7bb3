//! In-memory building model that retrofit measures edit.
//!
//! The model is handed in by the caller and handed back; measures never keep a
//! reference to it after they return.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::curve::PerformanceCurve;
use super::equipment::ZoneEquipment;
use super::plant::{PlantLoop, SupplyComponent};
use super::schedule::Schedule;
use super::types::{ThermalResistance, VolumeFlow};

pub const ALWAYS_ON_DISCRETE: &str = "Always On Discrete";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildingModel {
    pub name: String,
    #[serde(default)]
    pub zones: Vec<ThermalZone>,
    #[serde(default)]
    pub plant_loops: Vec<PlantLoop>,
    #[serde(default)]
    pub constructions: Vec<Construction>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub curves: Vec<PerformanceCurve>,
    #[serde(default)]
    pub simulation_control: SimulationControl,
}

/// Sizing and run flags read by the simulation engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationControl {
    pub do_zone_sizing: bool,
    pub do_system_sizing: bool,
    pub do_plant_sizing: bool,
    pub run_sizing_periods: bool,
}

impl SimulationControl {
    pub fn sizing_enabled(&self) -> bool {
        self.do_zone_sizing && self.do_system_sizing && self.do_plant_sizing && self.run_sizing_periods
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalZone {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub equipment: Vec<ZoneEquipment>,
    #[serde(default)]
    pub thermostat: Option<Thermostat>,
}

impl ThermalZone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            spaces: Vec::new(),
            equipment: Vec::new(),
            thermostat: None,
        }
    }

    pub fn with_space(mut self, space: Space) -> Self {
        self.spaces.push(space);
        self
    }

    pub fn with_equipment(mut self, equipment: ZoneEquipment) -> Self {
        self.equipment.push(equipment);
        self
    }
}

/// Dual-setpoint thermostat; both fields are schedule ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thermostat {
    pub heating_setpoint: Uuid,
    pub cooling_setpoint: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub infiltration: Vec<InfiltrationDesignFlowRate>,
}

impl Space {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surfaces: Vec::new(),
            infiltration: Vec::new(),
        }
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.push(surface);
        self
    }

    pub fn with_infiltration(mut self, infiltration: InfiltrationDesignFlowRate) -> Self {
        self.infiltration.push(infiltration);
        self
    }

    pub fn is_perimeter(&self) -> bool {
        self.surfaces
            .iter()
            .any(|s| s.boundary == OutsideBoundary::Outdoors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfiltrationDesignFlowRate {
    pub name: String,
    /// Flow per exterior surface area (m³/s per m²).
    pub flow_per_exterior_surface_area: Option<VolumeFlow>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurfaceType {
    Wall,
    RoofCeiling,
    Floor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutsideBoundary {
    Outdoors,
    Ground,
    Adiabatic,
    Surface,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Surface {
    pub name: String,
    pub surface_type: SurfaceType,
    pub boundary: OutsideBoundary,
    #[serde(default)]
    pub construction: Option<Uuid>,
    #[serde(default)]
    pub sub_surfaces: Vec<SubSurface>,
}

impl Surface {
    pub fn new(name: impl Into<String>, surface_type: SurfaceType, boundary: OutsideBoundary) -> Self {
        Self {
            name: name.into(),
            surface_type,
            boundary,
            construction: None,
            sub_surfaces: Vec::new(),
        }
    }

    pub fn with_sub_surface(mut self, sub: SubSurface) -> Self {
        self.sub_surfaces.push(sub);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubSurfaceType {
    FixedWindow,
    OperableWindow,
    Door,
    GlassDoor,
    Skylight,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubSurface {
    pub name: String,
    pub sub_surface_type: SubSurfaceType,
    #[serde(default)]
    pub construction: Option<Uuid>,
}

impl SubSurface {
    pub fn new(name: impl Into<String>, sub_surface_type: SubSurfaceType) -> Self {
        Self {
            name: name.into(),
            sub_surface_type,
            construction: None,
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(
            self.sub_surface_type,
            SubSurfaceType::FixedWindow | SubSurfaceType::OperableWindow
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Construction {
    pub id: Uuid,
    pub name: String,
    pub layers: Vec<Material>,
}

impl Construction {
    pub fn new(name: impl Into<String>, layers: Vec<Material>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layers,
        }
    }

    /// The glazing layer when the construction is exactly one simple glazing.
    pub fn single_glazing_mut(&mut self) -> Option<(&mut f64, &mut f64)> {
        match self.layers.as_mut_slice() {
            [Material::SimpleGlazing { u_factor, shgc, .. }] => Some((u_factor, shgc)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    MasslessOpaque {
        name: String,
        thermal_resistance: ThermalResistance,
    },
    SimpleGlazing {
        name: String,
        /// W/m²·K
        u_factor: f64,
        shgc: f64,
    },
}

impl BuildingModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn zones(&self) -> &[ThermalZone] {
        &self.zones
    }

    pub fn zones_mut(&mut self) -> &mut [ThermalZone] {
        &mut self.zones
    }

    pub fn zone(&self, id: Uuid) -> Option<&ThermalZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.zones
            .iter()
            .flat_map(|z| z.spaces.iter())
            .flat_map(|s| s.surfaces.iter())
    }

    pub fn surfaces_mut(&mut self) -> impl Iterator<Item = &mut Surface> {
        self.zones
            .iter_mut()
            .flat_map(|z| z.spaces.iter_mut())
            .flat_map(|s| s.surfaces.iter_mut())
    }

    pub fn sub_surfaces(&self) -> impl Iterator<Item = &SubSurface> {
        self.surfaces().flat_map(|s| s.sub_surfaces.iter())
    }

    pub fn sub_surfaces_mut(&mut self) -> impl Iterator<Item = &mut SubSurface> {
        self.surfaces_mut().flat_map(|s| s.sub_surfaces.iter_mut())
    }

    pub fn spaces_mut(&mut self) -> impl Iterator<Item = &mut Space> {
        self.zones.iter_mut().flat_map(|z| z.spaces.iter_mut())
    }

    pub fn plant_loops(&self) -> &[PlantLoop] {
        &self.plant_loops
    }

    pub fn plant_loops_mut(&mut self) -> &mut [PlantLoop] {
        &mut self.plant_loops
    }

    pub fn boiler_count(&self) -> usize {
        self.plant_loops
            .iter()
            .flat_map(|l| l.supply_components.iter())
            .filter(|c| matches!(c, SupplyComponent::BoilerHotWater(_)))
            .count()
    }

    pub fn schedule(&self, id: Uuid) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn construction(&self, id: Uuid) -> Option<&Construction> {
        self.constructions.iter().find(|c| c.id == id)
    }

    pub fn construction_mut(&mut self, id: Uuid) -> Option<&mut Construction> {
        self.constructions.iter_mut().find(|c| c.id == id)
    }

    pub fn curve(&self, id: Uuid) -> Option<&PerformanceCurve> {
        self.curves.iter().find(|c| c.id == id)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    pub fn add_zone(&mut self, zone: ThermalZone) -> Uuid {
        let id = zone.id;
        self.zones.push(zone);
        id
    }

    pub fn add_plant_loop(&mut self, plant_loop: PlantLoop) -> Uuid {
        let id = plant_loop.id;
        self.plant_loops.push(plant_loop);
        id
    }

    pub fn add_schedule(&mut self, schedule: Schedule) -> Uuid {
        let id = schedule.id;
        self.schedules.push(schedule);
        id
    }

    pub fn add_construction(&mut self, construction: Construction) -> Uuid {
        let id = construction.id;
        self.constructions.push(construction);
        id
    }

    /// Register a curve unless one with the same identity is already present.
    pub fn add_curve(&mut self, curve: &PerformanceCurve) -> Uuid {
        if self.curve(curve.id).is_none() {
            self.curves.push(curve.clone());
        }
        curve.id
    }

    /// Named all-day schedule holding `value`. An existing schedule with the
    /// same name is updated in place and keeps its id.
    pub fn set_all_day_schedule(&mut self, name: &str, value: f64) -> Uuid {
        if let Some(existing) = self.schedules.iter_mut().find(|s| s.name == name) {
            existing.kind = Schedule::all_day(name, value).kind;
            return existing.id;
        }
        self.add_schedule(Schedule::all_day(name, value))
    }

    /// Shared always-on discrete schedule, created on first use.
    pub fn always_on_discrete_schedule(&mut self) -> Uuid {
        if let Some(existing) = self.schedules.iter().find(|s| s.name == ALWAYS_ON_DISCRETE) {
            return existing.id;
        }
        self.add_schedule(Schedule::constant(ALWAYS_ON_DISCRETE, 1.0))
    }

    /// Drop curves no zone equipment references anymore. Returns how many
    /// were removed.
    pub fn purge_unused_curves(&mut self) -> usize {
        let referenced: HashSet<Uuid> = self
            .zones
            .iter()
            .flat_map(|z| z.equipment.iter())
            .flat_map(|e| e.curve_refs())
            .collect();
        let before = self.curves.len();
        self.curves.retain(|c| referenced.contains(&c.id));
        before - self.curves.len()
    }
}
