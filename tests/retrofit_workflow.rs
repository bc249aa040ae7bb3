//! End-to-end runs of the public API against a small midrise model.

use building_retrofit::domain::{
    Baseboard, BoilerHotWater, BuildingModel, Construction, EquipmentRole, InfiltrationDesignFlowRate,
    Material, OutsideBoundary, PlantLoop, Power, Pump, Schedule, Space, SubSurface, SubSurfaceType,
    SupplyComponent, Surface, SurfaceType, ThermalZone, Volume, WaterHeaterMixed, WindowAirConditioner,
    ZoneEquipment,
};
use building_retrofit::measures::{
    self, AirLeakage, DhwChoice, DhwHeatPump, ErvChoice, HvacChoice, RetrofitContext, WallRValue,
    WindowGlazing,
};
use building_retrofit::messages::{MessageLevel, RecordingSink};
use building_retrofit::retrofit::{curve_set_for, Technology};
use building_retrofit::units::StandardUnits;
use building_retrofit::{MeasureSelection, RetrofitError, Workflow};
use rstest::rstest;
use strum::IntoEnumIterator;

fn apartment(name: &str) -> ThermalZone {
    ThermalZone::new(name)
        .with_space(
            Space::new(format!("{name} Space"))
                .with_surface(
                    Surface::new(format!("{name} Exterior Wall"), SurfaceType::Wall, OutsideBoundary::Outdoors)
                        .with_sub_surface(SubSurface::new(format!("{name} Window"), SubSurfaceType::FixedWindow)),
                )
                .with_infiltration(InfiltrationDesignFlowRate {
                    name: format!("{name} Infiltration"),
                    flow_per_exterior_surface_area: None,
                }),
        )
        .with_equipment(ZoneEquipment::Baseboard(Baseboard {
            name: format!("{name} Baseboard"),
            hot_water: true,
        }))
        .with_equipment(ZoneEquipment::WindowAirConditioner(WindowAirConditioner {
            name: format!("{name} Window AC"),
            rated_cop: 2.9,
        }))
}

fn midrise() -> BuildingModel {
    let mut model = BuildingModel::new("Midrise Apartment");
    for i in 1..=4 {
        model.add_zone(apartment(&format!("Apartment {i}")));
    }
    model.add_zone(
        ThermalZone::new("Ground Corridor").with_space(
            Space::new("Corridor Space").with_surface(Surface::new(
                "Corridor Roof",
                SurfaceType::RoofCeiling,
                OutsideBoundary::Outdoors,
            )),
        ),
    );
    model.add_zone(ThermalZone::new("Attic Plenum"));

    let setpoint = model.add_schedule(Schedule::all_day("DHW Setpoint", 60.0));
    let mut dhw = PlantLoop::new("Service Water DHW Loop");
    dhw.supply_components.push(SupplyComponent::Pump(Pump {
        name: "DHW Pump".into(),
        variable_speed: false,
    }));
    dhw.supply_components.push(SupplyComponent::WaterHeaterMixed(WaterHeaterMixed {
        name: "Gas Storage Tank".into(),
        tank_volume: Volume::cubic_metres(0.76),
        heater_capacity: Power::kilowatts(45.0),
        fuel: "NaturalGas".into(),
        setpoint_schedule: Some(setpoint),
    }));
    model.add_plant_loop(dhw);

    let mut hw = PlantLoop::new("Heating Hot Water Loop");
    hw.supply_components.push(SupplyComponent::BoilerHotWater(BoilerHotWater {
        name: "Atmospheric Boiler".into(),
        nominal_thermal_efficiency: 0.80,
        fuel: "NaturalGas".into(),
    }));
    model.add_plant_loop(hw);
    model
}

fn full_selection() -> MeasureSelection {
    MeasureSelection {
        wall_insulation: Some(WallRValue::R20),
        window_construction: Some(WindowGlazing::TripleLowE),
        infiltration: Some(AirLeakage::L060),
        hvac_system: Some(HvacChoice::MiniSplit),
        in_unit_erv: Some(ErvChoice::AddErv),
        dhw: Some(DhwChoice::Upgrade),
        ..Default::default()
    }
}

#[test]
fn full_retrofit_reaches_expected_state() {
    let mut model = midrise();
    let mut sink = RecordingSink::new();
    let report = Workflow::new(full_selection()).run(&mut model, &StandardUnits, &mut sink);

    assert!(report.success, "{report:?}");
    assert_eq!(report.steps.len(), 6);
    assert!(model.simulation_control.sizing_enabled());

    for zone in &model.zones()[..4] {
        let roles: Vec<_> = zone.equipment.iter().map(|e| e.role()).collect();
        assert_eq!(roles, [EquipmentRole::Conditioning, EquipmentRole::Ventilation]);
    }
    // The ERV measure after the HVAC choice finds every apartment served.
    assert_eq!(report.steps[4].measure, "Add In-Unit ERV");
    assert!(report.steps[4].outcome.starts_with("No zones matching"));

    let corridor = &model.zones()[4];
    assert_eq!(corridor.equipment.len(), 1);
    assert!(corridor.thermostat.is_some());
    assert!(model.zones()[5].equipment.is_empty());

    let dhw = &model.plant_loops()[0];
    let SupplyComponent::WaterHeaterHeatPump(hpwh) = &dhw.supply_components[0] else {
        panic!("heat pump water heater should sit at the supply inlet");
    };
    assert!((hpwh.rated_capacity.as_watts() - 40_000.0 / 2.2).abs() < 0.01);
    assert_eq!(hpwh.backup_capacity.as_watts(), 5000.0);
    assert_eq!(model.schedule(hpwh.setpoint_schedule.unwrap()).unwrap().name, "DHW Setpoint");
    assert_eq!(hpwh.thermal_zone, Some(corridor.id));

    // Only the six Mini-Split curves remain.
    assert_eq!(model.curves.len(), 6);
    assert!(sink.has(MessageLevel::FinalCondition));
}

#[test]
fn rerunning_the_workflow_is_stable() {
    let mut model = midrise();
    let workflow = Workflow::new(MeasureSelection {
        hvac_system: Some(HvacChoice::PackagedHp),
        in_unit_erv: Some(ErvChoice::AddErv),
        ..Default::default()
    });
    let mut sink = RecordingSink::new();
    workflow.run(&mut model, &StandardUnits, &mut sink);
    let equipment_after_first: Vec<usize> = model.zones().iter().map(|z| z.equipment.len()).collect();

    let report = workflow.run(&mut model, &StandardUnits, &mut sink);
    assert!(report.success);
    let equipment_after_second: Vec<usize> = model.zones().iter().map(|z| z.equipment.len()).collect();
    assert_eq!(equipment_after_first, equipment_after_second);
    assert_eq!(equipment_after_second, [2, 2, 2, 2, 1, 0]);
}

#[test]
fn missing_dhw_loop_fails_without_structural_change() {
    let mut model = midrise();
    model.plant_loops_mut()[0].name = "Service Water Loop".into();
    let before = model.clone();

    let mut sink = RecordingSink::new();
    let ok = {
        let mut ctx = RetrofitContext::new(&StandardUnits, &mut sink);
        measures::run(&DhwHeatPump::new(DhwChoice::Upgrade), &mut model, &mut ctx)
    };

    assert!(!ok);
    assert_eq!(model, before);
    assert_eq!(
        sink.messages()[0].text,
        "Upgrade DHW to HPWH: No plant loop matching 'DHW' found"
    );
}

#[test]
fn failure_stops_later_measures() {
    let mut model = midrise();
    model.zones.retain(|z| !z.name.contains("Corridor"));
    let mut selection = full_selection();
    selection.condensing_boiler = Some(building_retrofit::measures::BoilerChoice::Condensing);

    let mut sink = RecordingSink::new();
    let report = Workflow::new(selection).run(&mut model, &StandardUnits, &mut sink);

    assert!(!report.success);
    let last = report.steps.last().unwrap();
    assert_eq!(last.measure, "Upgrade DHW to HPWH");
    assert!(!last.success);
    assert_eq!(report.steps.iter().filter(|s| !s.success).count(), 1);
}

#[test]
fn window_construction_replaces_existing_glazing() {
    let mut model = midrise();
    let old = model.add_construction(Construction::new(
        "Single Pane",
        vec![Material::SimpleGlazing {
            name: "Single Pane Glass".into(),
            u_factor: 5.8,
            shgc: 0.8,
        }],
    ));
    for window in model.sub_surfaces_mut() {
        window.construction = Some(old);
    }

    let mut sink = RecordingSink::new();
    let report = Workflow::new(MeasureSelection {
        window_construction: Some(WindowGlazing::DoubleTintedLowE),
        ..Default::default()
    })
    .run(&mut model, &StandardUnits, &mut sink);

    assert!(report.success);
    assert_eq!(report.steps[0].outcome, "Updated 4 windows to double_tinted_lowE (U-0.3, SHGC-0.3).");
    assert!(model.sub_surfaces().all(|w| w.construction != Some(old)));
}

#[rstest]
#[case("Mini-Split", Technology::MiniSplit)]
#[case("Packaged HP", Technology::PackagedTerminalHeatPump)]
#[case("In-Unit HP", Technology::InUnitHeatPump)]
fn curve_sets_resolve_by_tag(#[case] tag: &str, #[case] technology: Technology) {
    let set = curve_set_for(tag).unwrap();
    assert_eq!(set.technology, technology);
    assert_eq!(set.len(), 6);
    for (_, curve) in set.curves() {
        assert!(matches!(curve.coefficients().len(), 4 | 6));
    }
}

#[test]
fn unknown_technology_tag() {
    assert!(matches!(
        curve_set_for("Geothermal"),
        Err(RetrofitError::UnknownTechnology(_))
    ));
    assert_eq!(Technology::iter().count(), 3);
}

#[test]
fn model_survives_json_round_trip_after_retrofit() {
    let mut model = midrise();
    let mut sink = RecordingSink::new();
    Workflow::new(full_selection()).run(&mut model, &StandardUnits, &mut sink);

    let json = serde_json::to_string(&model).unwrap();
    let back: BuildingModel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, model);
}
