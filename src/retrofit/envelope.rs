//! Envelope edits: opaque insulation, glazing and air leakage.
//!
//! These are single-assignment edits. Each takes IP inputs, converts them
//! through the unit converter before touching the model and returns how many
//! objects it changed.

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    BuildingModel, Construction, Material, OutsideBoundary, Surface, SurfaceType,
    ThermalResistance, VolumeFlow,
};
use crate::error::Result;
use crate::units::{self, UnitConverter, FT3_PER_MIN, M3_PER_S, R_VALUE_IP, R_VALUE_SI, U_VALUE_IP, U_VALUE_SI};

/// SHGC given to new glazing when only the U-factor is being set.
pub const FALLBACK_SHGC: f64 = 0.35;
/// U-factor (W/m²·K) given to new glazing when only the SHGC is being set.
pub const FALLBACK_U_FACTOR_SI: f64 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueTarget {
    ExteriorWall,
    Roof,
}

impl OpaqueTarget {
    fn surface_type(self) -> SurfaceType {
        match self {
            OpaqueTarget::ExteriorWall => SurfaceType::Wall,
            OpaqueTarget::Roof => SurfaceType::RoofCeiling,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OpaqueTarget::ExteriorWall => "Wall",
            OpaqueTarget::Roof => "Roof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsulationResult {
    pub surfaces: usize,
    pub r_si: ThermalResistance,
}

/// Put a single massless insulation layer of `r_ip` on every outdoor
/// surface of the target type. No construction is created when there is
/// nothing to apply it to.
pub fn apply_opaque_insulation(
    model: &mut BuildingModel,
    target: OpaqueTarget,
    r_ip: f64,
    units: &dyn UnitConverter,
) -> Result<InsulationResult> {
    let r_si = ThermalResistance::si(units::convert(units, r_ip, R_VALUE_IP, R_VALUE_SI)?);
    let surface_type = target.surface_type();
    let is_target = |s: &Surface| {
        s.surface_type == surface_type && s.boundary == OutsideBoundary::Outdoors
    };

    if !model.surfaces().any(|s| is_target(s)) {
        return Ok(InsulationResult { surfaces: 0, r_si });
    }

    let label = target.label();
    let construction = Construction::new(
        format!("Upgraded {label} R-{r_ip}"),
        vec![Material::MasslessOpaque {
            name: format!("{label} Insulation R-{r_ip} ({:.2} SI)", r_si.as_si()),
            thermal_resistance: r_si,
        }],
    );
    let id = model.add_construction(construction);

    let mut surfaces = 0;
    for surface in model.surfaces_mut().filter(|s| is_target(s)) {
        surface.construction = Some(id);
        surfaces += 1;
    }
    info!(surface_kind = label, surfaces, %r_si, "applied opaque insulation");
    Ok(InsulationResult { surfaces, r_si })
}

/// One simple-glazing property to set on every window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlazingProperty {
    /// U-factor in Btu/h·ft²·°F.
    UFactorIp(f64),
    Shgc(f64),
}

/// Set `property` on every window. Windows whose construction is a single
/// simple-glazing layer are edited in place; the rest get a shared new
/// construction with a fallback value for the other property.
pub fn set_window_glazing(
    model: &mut BuildingModel,
    property: GlazingProperty,
    units: &dyn UnitConverter,
) -> Result<usize> {
    let (u_si, shgc) = match property {
        GlazingProperty::UFactorIp(u) => (Some(units::convert(units, u, U_VALUE_IP, U_VALUE_SI)?), None),
        GlazingProperty::Shgc(shgc) => (None, Some(shgc)),
    };

    let current: Vec<Option<Uuid>> = model
        .sub_surfaces()
        .filter(|s| s.is_window())
        .map(|s| s.construction)
        .collect();

    let mut fallback: Option<Uuid> = None;
    let mut assignments = Vec::with_capacity(current.len());
    for construction in current {
        let edited = construction
            .and_then(|id| model.construction_mut(id))
            .and_then(|c| c.single_glazing_mut())
            .map(|(u, g)| {
                if let Some(v) = u_si {
                    *u = v;
                }
                if let Some(v) = shgc {
                    *g = v;
                }
            })
            .is_some();
        if edited {
            assignments.push(None);
            continue;
        }

        let id = *fallback.get_or_insert_with(|| {
            let name = match property {
                GlazingProperty::UFactorIp(u) => format!("U-{u}"),
                GlazingProperty::Shgc(g) => format!("SHGC-{g}"),
            };
            model.add_construction(Construction::new(
                format!("Window {name}"),
                vec![Material::SimpleGlazing {
                    name: format!("Glazing {name}"),
                    u_factor: u_si.unwrap_or(FALLBACK_U_FACTOR_SI),
                    shgc: shgc.unwrap_or(FALLBACK_SHGC),
                }],
            ))
        });
        assignments.push(Some(id));
    }

    let updated = assignments.len();
    for (window, assignment) in model
        .sub_surfaces_mut()
        .filter(|s| s.is_window())
        .zip(assignments)
    {
        if let Some(id) = assignment {
            debug!(window = %window.name, "assigning new glazing construction");
            window.construction = Some(id);
        }
    }
    info!(?property, windows = updated, "updated window glazing");
    Ok(updated)
}

/// Give every window one new simple-glazing construction.
pub fn replace_window_construction(
    model: &mut BuildingModel,
    u_ip: f64,
    shgc: f64,
    units: &dyn UnitConverter,
) -> Result<usize> {
    let u_si = units::convert(units, u_ip, U_VALUE_IP, U_VALUE_SI)?;
    if !model.sub_surfaces().any(|s| s.is_window()) {
        return Ok(0);
    }

    let name = format!("U-{u_si:.3}_SHGC-{shgc}");
    let id = model.add_construction(Construction::new(
        format!("Window {name}"),
        vec![Material::SimpleGlazing {
            name: format!("Glazing {name}"),
            u_factor: u_si,
            shgc,
        }],
    ));

    let mut windows = 0;
    for window in model.sub_surfaces_mut().filter(|s| s.is_window()) {
        window.construction = Some(id);
        windows += 1;
    }
    info!(windows, u_si, shgc, "replaced window construction");
    Ok(windows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfiltrationResult {
    pub perimeter_spaces: usize,
    pub objects_updated: usize,
}

/// Set the flow per exterior surface area on every infiltration object of
/// every perimeter space.
pub fn set_infiltration_rate(
    model: &mut BuildingModel,
    cfm_per_ft2: f64,
    units: &dyn UnitConverter,
) -> Result<InfiltrationResult> {
    // Converted as a plain volume flow, matching the rates seed models carry.
    let flow = VolumeFlow::cubic_metres_per_second(units::convert(units, cfm_per_ft2, FT3_PER_MIN, M3_PER_S)?);

    let mut result = InfiltrationResult::default();
    for space in model.spaces_mut().filter(|s| s.is_perimeter()) {
        result.perimeter_spaces += 1;
        for infiltration in &mut space.infiltration {
            infiltration.flow_per_exterior_surface_area = Some(flow);
            result.objects_updated += 1;
        }
    }
    info!(
        perimeter_spaces = result.perimeter_spaces,
        objects_updated = result.objects_updated,
        %flow,
        "updated infiltration"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        InfiltrationDesignFlowRate, Space, SubSurface, SubSurfaceType, ThermalZone,
    };
    use crate::error::RetrofitError;
    use crate::units::{MockUnitConverter, StandardUnits};
    use rstest::rstest;

    fn infiltration(name: &str) -> InfiltrationDesignFlowRate {
        InfiltrationDesignFlowRate {
            name: name.into(),
            flow_per_exterior_surface_area: None,
        }
    }

    fn model() -> BuildingModel {
        let mut model = BuildingModel::new("Midrise");
        model.add_zone(
            ThermalZone::new("Apartment 1")
                .with_space(
                    Space::new("A1")
                        .with_surface(
                            Surface::new("A1 South", SurfaceType::Wall, OutsideBoundary::Outdoors)
                                .with_sub_surface(SubSurface::new("A1 Win 1", SubSurfaceType::FixedWindow))
                                .with_sub_surface(SubSurface::new("A1 Win 2", SubSurfaceType::OperableWindow))
                                .with_sub_surface(SubSurface::new("A1 Door", SubSurfaceType::Door)),
                        )
                        .with_surface(Surface::new("A1 Party", SurfaceType::Wall, OutsideBoundary::Adiabatic))
                        .with_surface(Surface::new("A1 Roof", SurfaceType::RoofCeiling, OutsideBoundary::Outdoors))
                        .with_infiltration(infiltration("A1 Infiltration")),
                ),
        );
        model.add_zone(
            ThermalZone::new("Core").with_space(
                Space::new("Core")
                    .with_surface(Surface::new("Core Floor", SurfaceType::Floor, OutsideBoundary::Ground))
                    .with_infiltration(infiltration("Core Infiltration")),
            ),
        );
        model
    }

    #[rstest]
    #[case(OpaqueTarget::ExteriorWall, 20.0, "A1 South")]
    #[case(OpaqueTarget::Roof, 30.0, "A1 Roof")]
    fn test_opaque_insulation_hits_outdoor_surfaces(
        #[case] target: OpaqueTarget,
        #[case] r_ip: f64,
        #[case] surface: &str,
    ) {
        let mut model = model();
        let result = apply_opaque_insulation(&mut model, target, r_ip, &StandardUnits).unwrap();

        assert_eq!(result.surfaces, 1);
        assert!((result.r_si.as_si() - r_ip * 0.1761102).abs() < 1e-6);
        let applied: Vec<_> = model.surfaces().filter(|s| s.construction.is_some()).collect();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, surface);
        assert_eq!(model.constructions.len(), 1);
    }

    #[test]
    fn test_opaque_insulation_without_targets_adds_nothing() {
        let mut model = BuildingModel::new("Empty");
        model.add_zone(ThermalZone::new("Z").with_space(Space::new("S")));
        let result = apply_opaque_insulation(&mut model, OpaqueTarget::Roof, 40.0, &StandardUnits).unwrap();
        assert_eq!(result.surfaces, 0);
        assert!(model.constructions.is_empty());
    }

    #[test]
    fn test_glazing_edit_in_place_for_simple_glazing() {
        let mut model = model();
        let existing = model.add_construction(Construction::new(
            "Existing Window",
            vec![Material::SimpleGlazing {
                name: "Old Glass".into(),
                u_factor: 3.35,
                shgc: 0.40,
            }],
        ));
        for w in model.sub_surfaces_mut().filter(|s| s.is_window()) {
            w.construction = Some(existing);
        }

        let updated = set_window_glazing(&mut model, GlazingProperty::Shgc(0.25), &StandardUnits).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(model.constructions.len(), 1);
        assert_eq!(
            model.construction(existing).unwrap().layers[0],
            Material::SimpleGlazing {
                name: "Old Glass".into(),
                u_factor: 3.35,
                shgc: 0.25
            }
        );
    }

    #[test]
    fn test_glazing_fallback_creates_shared_construction() {
        let mut model = model();
        let updated = set_window_glazing(&mut model, GlazingProperty::UFactorIp(0.28), &StandardUnits).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(model.constructions.len(), 1);
        let c = &model.constructions[0];
        let Material::SimpleGlazing { u_factor, shgc, .. } = &c.layers[0] else {
            panic!("expected simple glazing");
        };
        assert!((u_factor - 0.28 * 5.67826334).abs() < 1e-6);
        assert_eq!(*shgc, FALLBACK_SHGC);
        assert!(model
            .sub_surfaces()
            .filter(|s| s.is_window())
            .all(|s| s.construction == Some(c.id)));
        // Doors are never glazing targets.
        assert!(model.sub_surfaces().find(|s| !s.is_window()).unwrap().construction.is_none());
    }

    #[test]
    fn test_replace_window_construction() {
        let mut model = model();
        let windows = replace_window_construction(&mut model, 0.20, 0.25, &StandardUnits).unwrap();
        assert_eq!(windows, 2);
        assert_eq!(model.constructions.len(), 1);
    }

    #[test]
    fn test_infiltration_only_on_perimeter_spaces() {
        let mut model = model();
        let result = set_infiltration_rate(&mut model, 0.60, &StandardUnits).unwrap();

        assert_eq!(result, InfiltrationResult { perimeter_spaces: 1, objects_updated: 1 });
        assert!(model.zones()[0].spaces[0].infiltration[0].flow_per_exterior_surface_area.is_some());
        assert!(model.zones()[1].spaces[0].infiltration[0].flow_per_exterior_surface_area.is_none());
    }

    #[test]
    fn test_conversion_failure_leaves_model_alone() {
        let mut units = MockUnitConverter::new();
        units.expect_convert().times(1).returning(|_, _, _| None);
        let mut model = model();
        let before = model.clone();

        let err = apply_opaque_insulation(&mut model, OpaqueTarget::ExteriorWall, 15.0, &units).unwrap_err();
        assert!(matches!(err, RetrofitError::ConversionFailed { .. }));
        assert_eq!(model, before);
    }
}
