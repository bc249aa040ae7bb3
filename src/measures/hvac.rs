//! Space-conditioning measures.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Measure, Outcome, RetrofitContext};
use crate::domain::BuildingModel;
use crate::error::Result;
use crate::retrofit::{
    apply_technology, install_sized_ventilation, mark_for_sizing, upgrade_boilers, Technology,
    VentilationSpec, CONDENSING_BOILER_EFFICIENCY,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum HvacChoice {
    /// Radiant heating with window air conditioners; left as is.
    #[default]
    Baseline,
    #[serde(rename = "Mini-Split")]
    #[strum(serialize = "Mini-Split")]
    MiniSplit,
    #[serde(rename = "Packaged HP")]
    #[strum(serialize = "Packaged HP")]
    PackagedHp,
}

impl HvacChoice {
    pub fn technology(self) -> Option<Technology> {
        match self {
            HvacChoice::Baseline => None,
            HvacChoice::MiniSplit => Some(Technology::MiniSplit),
            HvacChoice::PackagedHp => Some(Technology::PackagedTerminalHeatPump),
        }
    }
}

/// Replace every conditioned zone's equipment with the chosen heat pump
/// and add ERVs to the apartments.
#[derive(Debug, Clone)]
pub struct HvacSystemChoice {
    pub choice: HvacChoice,
    pub ventilation: VentilationSpec,
}

impl HvacSystemChoice {
    pub fn new(choice: HvacChoice) -> Self {
        Self {
            choice,
            ventilation: VentilationSpec::default(),
        }
    }
}

impl Measure for HvacSystemChoice {
    fn name(&self) -> &'static str {
        "HVAC System Choice"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        let Some(technology) = self.choice.technology() else {
            return Ok(Outcome::Unchanged("No change made to HVAC system.".into()));
        };

        // Resolve the ERV sizing first: a conversion failure must not leave
        // the zones rebuilt without ventilation.
        let sizing = self.ventilation.size(ctx.units)?;
        let zones = apply_technology(model, technology)?;
        let ervs = install_sized_ventilation(model, &self.ventilation, sizing);

        if zones == 0 && ervs == 0 {
            return Ok(Outcome::NotApplicable(
                "No thermal zones with spaces found in the model.".into(),
            ));
        }
        if zones > 0 {
            ctx.sink.info(&format!("Installed {technology} units in {zones} zones."));
        }
        if ervs == 0 {
            ctx.sink.info(&format!(
                "No zones matching '{}' needed an ERV.",
                self.ventilation.zone_pattern
            ));
        }

        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Replaced HVAC in {zones} zones with {technology}, added {ervs} ERVs."
        )))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PackagedHpChoice {
    #[default]
    None,
    Upgrade,
}

/// Stand-alone packaged heat pump upgrade without ventilation changes.
#[derive(Debug, Clone, Copy)]
pub struct PackagedHeatPump {
    pub choice: PackagedHpChoice,
}

impl Measure for PackagedHeatPump {
    fn name(&self) -> &'static str {
        "Packaged Heat Pump"
    }

    fn apply(&self, model: &mut BuildingModel, _ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        if self.choice == PackagedHpChoice::None {
            return Ok(Outcome::Unchanged("No HVAC upgrade selected.".into()));
        }

        let zones = apply_technology(model, Technology::InUnitHeatPump)?;
        if zones == 0 {
            return Ok(Outcome::NotApplicable(
                "No thermal zones with spaces found in the model.".into(),
            ));
        }
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Replaced HVAC systems in {zones} zones with packaged heat pumps."
        )))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum BoilerChoice {
    #[default]
    Baseline,
    Condensing,
}

#[derive(Debug, Clone, Copy)]
pub struct CondensingBoiler {
    pub choice: BoilerChoice,
}

impl Measure for CondensingBoiler {
    fn name(&self) -> &'static str {
        "Condensing Boiler"
    }

    fn apply(&self, model: &mut BuildingModel, _ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        if self.choice == BoilerChoice::Baseline {
            return Ok(Outcome::Unchanged("No change made to boilers.".into()));
        }

        let boilers = upgrade_boilers(model, CONDENSING_BOILER_EFFICIENCY);
        if boilers == 0 {
            return Ok(Outcome::NotApplicable("No hot water boilers found in the model.".into()));
        }
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Set {boilers} boilers to {CONDENSING_BOILER_EFFICIENCY} nominal thermal efficiency."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Baseboard, BoilerHotWater, EquipmentRole, PlantLoop, Space, SupplyComponent, ThermalZone,
        ZoneEquipment,
    };
    use crate::error::RetrofitError;
    use crate::measures::{run, ErvChoice, InUnitErv};
    use crate::messages::{MessageLevel, RecordingSink};
    use crate::retrofit::curve_set;
    use crate::units::{MockUnitConverter, StandardUnits};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn midrise() -> BuildingModel {
        let mut model = BuildingModel::new("Midrise");
        model.add_zone(ThermalZone::new("Apartment 1").with_space(Space::new("A1")));
        model.add_zone(ThermalZone::new("Apartment 2").with_space(Space::new("A2")));
        model.add_zone(ThermalZone::new("Corridor").with_space(Space::new("C")));
        model.add_zone(ThermalZone::new("Plenum"));
        model
    }

    fn apply(measure: &dyn Measure, model: &mut BuildingModel) -> (Outcome, RecordingSink) {
        let mut sink = RecordingSink::new();
        let outcome = {
            let mut ctx = RetrofitContext::new(&StandardUnits, &mut sink);
            measure.apply(model, &mut ctx).unwrap()
        };
        (outcome, sink)
    }

    #[rstest]
    #[case(HvacChoice::MiniSplit, 5.667)]
    #[case(HvacChoice::PackagedHp, 3.645)]
    fn test_hvac_choice_installs_technology_and_ervs(#[case] choice: HvacChoice, #[case] cooling_cop: f64) {
        let mut model = midrise();
        let (outcome, _) = apply(&HvacSystemChoice::new(choice), &mut model);

        assert!(outcome.is_applied());
        assert!(model.simulation_control.sizing_enabled());
        for zone in &model.zones()[..2] {
            assert_eq!(zone.equipment.len(), 2);
            let ZoneEquipment::PackagedTerminalHeatPump(unit) = &zone.equipment[0] else {
                panic!("expected terminal unit first");
            };
            assert_eq!(unit.cooling_coil.rated_cop, cooling_cop);
            assert_eq!(zone.equipment[1].role(), EquipmentRole::Ventilation);
        }
        // Corridor gets a heat pump but no ERV; the plenum is left alone.
        assert_eq!(model.zones()[2].equipment.len(), 1);
        assert!(model.zones()[3].equipment.is_empty());
    }

    #[test]
    fn test_hvac_choice_rerun_does_not_duplicate() {
        let mut model = midrise();
        let measure = HvacSystemChoice::new(HvacChoice::MiniSplit);
        apply(&measure, &mut model);
        apply(&measure, &mut model);

        // Zone retrofit clears the ERV, the installer adds exactly one back.
        for zone in &model.zones()[..2] {
            assert_eq!(zone.equipment.len(), 2);
        }
    }

    #[test]
    fn test_baseline_leaves_model_unchanged() {
        let mut model = midrise();
        let before = model.clone();
        let (outcome, _) = apply(&HvacSystemChoice::new(HvacChoice::Baseline), &mut model);
        assert!(matches!(outcome, Outcome::Unchanged(_)));
        assert_eq!(model, before);
    }

    #[test]
    fn test_no_conditioned_zones_is_not_applicable() {
        let mut model = BuildingModel::new("Shell");
        model.add_zone(ThermalZone::new("Plenum"));
        let mut sink = RecordingSink::new();
        let mut ctx = RetrofitContext::new(&StandardUnits, &mut sink);

        assert!(run(&HvacSystemChoice::new(HvacChoice::MiniSplit), &mut model, &mut ctx));
        drop(ctx);
        assert!(sink.has(MessageLevel::NotApplicable));
        assert!(!model.simulation_control.sizing_enabled());
    }

    #[test]
    fn test_ventilation_sizing_failure_leaves_zones_untouched() {
        let mut model = midrise();
        model.zones_mut()[0].equipment.push(ZoneEquipment::Baseboard(Baseboard {
            name: "Apartment 1 Baseboard".into(),
            hot_water: true,
        }));
        let before = model.clone();

        let mut units = MockUnitConverter::new();
        units.expect_convert().returning(|_, _, _| None);
        let mut sink = RecordingSink::new();
        let err = {
            let mut ctx = RetrofitContext::new(&units, &mut sink);
            HvacSystemChoice::new(HvacChoice::MiniSplit)
                .apply(&mut model, &mut ctx)
                .unwrap_err()
        };

        assert!(matches!(err, RetrofitError::ConversionFailed { .. }));
        assert_eq!(model, before);
    }

    #[test]
    fn test_apartments_without_spaces_still_get_ervs() {
        let mut model = BuildingModel::new("Shell");
        model.add_zone(ThermalZone::new("Apartment 1"));
        model.add_zone(ThermalZone::new("Plenum"));

        let (outcome, _) = apply(&HvacSystemChoice::new(HvacChoice::PackagedHp), &mut model);

        assert_eq!(outcome.message(), "Replaced HVAC in 0 zones with Packaged HP, added 1 ERVs.");
        assert_eq!(model.zones()[0].equipment[0].role(), EquipmentRole::Ventilation);
        assert!(model.zones()[1].equipment.is_empty());
        assert!(model.simulation_control.sizing_enabled());
    }

    #[test]
    fn test_packaged_heat_pump_adds_no_ventilation() {
        let mut model = midrise();
        let (outcome, _) = apply(&PackagedHeatPump { choice: PackagedHpChoice::Upgrade }, &mut model);

        assert_eq!(outcome.message(), "Replaced HVAC systems in 3 zones with packaged heat pumps.");
        assert!(model
            .zones()
            .iter()
            .flat_map(|z| z.equipment.iter())
            .all(|e| e.role() == EquipmentRole::Conditioning));
    }

    #[test]
    fn test_condensing_boiler() {
        let mut model = midrise();
        let mut hw = PlantLoop::new("Hot Water Loop");
        hw.supply_components.push(SupplyComponent::BoilerHotWater(BoilerHotWater {
            name: "Boiler".into(),
            nominal_thermal_efficiency: 0.8,
            fuel: "NaturalGas".into(),
        }));
        model.add_plant_loop(hw);

        let (outcome, _) = apply(&CondensingBoiler { choice: BoilerChoice::Condensing }, &mut model);
        assert!(outcome.is_applied());
        assert!(model.simulation_control.sizing_enabled());
    }

    #[test]
    fn test_condensing_boiler_without_boilers() {
        let mut model = midrise();
        let (outcome, _) = apply(&CondensingBoiler { choice: BoilerChoice::Condensing }, &mut model);
        assert!(matches!(outcome, Outcome::NotApplicable(_)));
    }

    fn switch_to(model: &mut BuildingModel, technology: Technology) {
        match technology {
            Technology::MiniSplit => apply(&HvacSystemChoice::new(HvacChoice::MiniSplit), model),
            Technology::PackagedTerminalHeatPump => {
                apply(&HvacSystemChoice::new(HvacChoice::PackagedHp), model)
            }
            Technology::InUnitHeatPump => {
                apply(&PackagedHeatPump { choice: PackagedHpChoice::Upgrade }, model);
                apply(&InUnitErv::new(ErvChoice::AddErv), model)
            }
        };
    }

    proptest! {
        #[test]
        fn prop_switching_technologies_keeps_one_erv_per_apartment(
            sequence in prop::collection::vec(
                prop::sample::select(Technology::iter().collect::<Vec<_>>()),
                1..6,
            ),
        ) {
            let mut model = midrise();
            for technology in sequence {
                switch_to(&mut model, technology);

                for zone in model.zones() {
                    let ervs = zone
                        .equipment
                        .iter()
                        .filter(|e| e.role() == EquipmentRole::Ventilation)
                        .count();
                    let expected = usize::from(zone.name.starts_with("Apartment"));
                    prop_assert_eq!(ervs, expected, "{}", zone.name);
                }

                let active: HashSet<_> = curve_set(technology)
                    .unwrap()
                    .curves()
                    .map(|(_, c)| c.id)
                    .collect();
                let present: HashSet<_> = model.curves.iter().map(|c| c.id).collect();
                prop_assert_eq!(present, active);
            }
        }
    }
}
