//! Builds one fully wired packaged terminal heat pump from a curve set.

use uuid::Uuid;

use crate::domain::{
    DxCoil, ElectricCoil, OnOffFan, Pressure, Schedule, TerminalUnit, VolumeFlow,
};
use crate::error::Result;

use super::curves::{CurveRole, CurveSet, RatedCops};

/// Nominal supply flow per unit, about 300 cfm.
pub const FAN_MAX_FLOW_M3_S: f64 = 0.142;
pub const FAN_MOTOR_EFFICIENCY: f64 = 0.9;
pub const FAN_EFFICIENCY: f64 = 0.6;
pub const FAN_PRESSURE_RISE_PA: f64 = 400.0;

/// Build a terminal unit for `zone_name`. Every slot of `curves` must be
/// filled; the unit only references curves by id.
pub fn build_terminal_unit(
    curves: &CurveSet,
    cops: RatedCops,
    zone_name: &str,
) -> Result<TerminalUnit> {
    let coil = |name: String,
                capacity: CurveRole,
                eir: CurveRole,
                part_load: CurveRole,
                rated_cop: f64|
     -> Result<DxCoil> {
        Ok(DxCoil {
            name,
            capacity_curve: curves.get(capacity)?.id,
            eir_curve: curves.get(eir)?.id,
            part_load_curve: curves.get(part_load)?.id,
            rated_cop,
        })
    };

    let cooling_coil = coil(
        format!("Cooling Coil - {zone_name}"),
        CurveRole::CoolingCapacity,
        CurveRole::CoolingEir,
        CurveRole::CoolingPartLoad,
        cops.cooling,
    )?;
    let heating_coil = coil(
        format!("Heating Coil - {zone_name}"),
        CurveRole::HeatingCapacity,
        CurveRole::HeatingEir,
        CurveRole::HeatingPartLoad,
        cops.heating,
    )?;

    let fan = OnOffFan {
        name: format!("Fan - {zone_name}"),
        maximum_flow_rate: VolumeFlow::cubic_metres_per_second(FAN_MAX_FLOW_M3_S),
        motor_efficiency: FAN_MOTOR_EFFICIENCY,
        fan_efficiency: FAN_EFFICIENCY,
        pressure_rise: Pressure::pascals(FAN_PRESSURE_RISE_PA),
    };

    Ok(TerminalUnit {
        id: Uuid::new_v4(),
        name: format!("{} - {zone_name}", curves.technology.unit_label()),
        availability: Schedule::constant(format!("Availability Schedule - {zone_name}"), 1.0),
        fan,
        cooling_coil,
        heating_coil,
        supplemental_heating_coil: ElectricCoil {
            name: format!("Supplemental Heating Coil - {zone_name}"),
            nominal_capacity: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PerformanceCurve;
    use crate::error::RetrofitError;
    use crate::retrofit::curves::{curve_set, Technology};

    #[test]
    fn test_unit_wiring() {
        let set = curve_set(Technology::MiniSplit).unwrap();
        let unit = build_terminal_unit(set, Technology::MiniSplit.rated_cops(), "Apartment 3").unwrap();

        assert_eq!(unit.name, "Mini-Split HP - Apartment 3");
        assert_eq!(unit.fan.name, "Fan - Apartment 3");
        assert_eq!(unit.fan.maximum_flow_rate.as_cubic_metres_per_second(), 0.142);
        assert_eq!(unit.fan.motor_efficiency, 0.9);
        assert_eq!(unit.fan.fan_efficiency, 0.6);
        assert_eq!(unit.fan.pressure_rise.as_pascals(), 400.0);
        assert_eq!(unit.cooling_coil.rated_cop, 5.667);
        assert_eq!(unit.heating_coil.rated_cop, 3.516);
        assert_eq!(unit.availability.value_at(0), Some(1.0));
        assert!(unit.supplemental_heating_coil.nominal_capacity.is_none());
    }

    #[test]
    fn test_coils_bound_to_matching_mode_curves() {
        let set = curve_set(Technology::PackagedTerminalHeatPump).unwrap();
        let unit = build_terminal_unit(set, Technology::PackagedTerminalHeatPump.rated_cops(), "Z").unwrap();

        assert_eq!(unit.cooling_coil.capacity_curve, set.get(CurveRole::CoolingCapacity).unwrap().id);
        assert_eq!(unit.cooling_coil.part_load_curve, set.get(CurveRole::CoolingPartLoad).unwrap().id);
        assert_eq!(unit.heating_coil.eir_curve, set.get(CurveRole::HeatingEir).unwrap().id);
        assert_eq!(unit.heating_coil.part_load_curve, set.get(CurveRole::HeatingPartLoad).unwrap().id);
        assert_eq!(unit.curve_refs().len(), 6);
    }

    #[test]
    fn test_builds_are_deterministic_apart_from_ids() {
        let set = curve_set(Technology::InUnitHeatPump).unwrap();
        let cops = Technology::InUnitHeatPump.rated_cops();
        let a = build_terminal_unit(set, cops, "Z").unwrap();
        let b = build_terminal_unit(set, cops, "Z").unwrap();
        assert_eq!(a.fan, b.fan);
        assert_eq!(a.cooling_coil, b.cooling_coil);
        assert_eq!(a.heating_coil, b.heating_coil);
    }

    #[test]
    fn test_incomplete_set_fails() {
        let mut set = CurveSet::new(Technology::MiniSplit);
        set.insert(
            CurveRole::CoolingPartLoad,
            PerformanceCurve::cubic("plr", [0.0, 1.0, 0.0, 0.0]),
        )
        .unwrap();

        let err = build_terminal_unit(&set, Technology::MiniSplit.rated_cops(), "Z").unwrap_err();
        assert!(matches!(err, RetrofitError::IncompleteCurveSet { .. }));
    }
}
