//! Envelope measures: insulation, glazing and air sealing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Measure, Outcome, RetrofitContext};
use crate::domain::BuildingModel;
use crate::error::Result;
use crate::retrofit::{
    apply_opaque_insulation, mark_for_sizing, replace_window_construction, set_infiltration_rate,
    set_window_glazing, GlazingProperty, OpaqueTarget,
};

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
        )]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                #[strum(serialize = $label)]
                $variant,
            )+
        }
    };
}

choice_enum! {
    WallRValue {
        None => "None",
        R10 => "R-10",
        R15 => "R-15",
        R20 => "R-20",
        R25 => "R-25",
    }
}

impl WallRValue {
    pub fn r_ip(self) -> Option<f64> {
        match self {
            WallRValue::None => None,
            WallRValue::R10 => Some(10.0),
            WallRValue::R15 => Some(15.0),
            WallRValue::R20 => Some(20.0),
            WallRValue::R25 => Some(25.0),
        }
    }
}

choice_enum! {
    RoofRValue {
        None => "None",
        R20 => "R-20",
        R30 => "R-30",
        R40 => "R-40",
    }
}

impl RoofRValue {
    pub fn r_ip(self) -> Option<f64> {
        match self {
            RoofRValue::None => None,
            RoofRValue::R20 => Some(20.0),
            RoofRValue::R30 => Some(30.0),
            RoofRValue::R40 => Some(40.0),
        }
    }
}

choice_enum! {
    /// Window U-factor, Btu/h·ft²·°F.
    WindowUValueChoice {
        None => "None",
        U032 => "0.32",
        U028 => "0.28",
        U022 => "0.22",
        U018 => "0.18",
    }
}

impl WindowUValueChoice {
    pub fn u_ip(self) -> Option<f64> {
        match self {
            WindowUValueChoice::None => None,
            WindowUValueChoice::U032 => Some(0.32),
            WindowUValueChoice::U028 => Some(0.28),
            WindowUValueChoice::U022 => Some(0.22),
            WindowUValueChoice::U018 => Some(0.18),
        }
    }
}

choice_enum! {
    WindowShgcValue {
        None => "None",
        Shgc025 => "0.25",
        Shgc035 => "0.35",
        Shgc040 => "0.40",
    }
}

impl WindowShgcValue {
    pub fn shgc(self) -> Option<f64> {
        match self {
            WindowShgcValue::None => None,
            WindowShgcValue::Shgc025 => Some(0.25),
            WindowShgcValue::Shgc035 => Some(0.35),
            WindowShgcValue::Shgc040 => Some(0.40),
        }
    }
}

choice_enum! {
    WindowGlazing {
        Baseline => "baseline",
        DoubleClearLowE => "double_clear_lowE",
        DoubleTintedLowE => "double_tinted_lowE",
        TripleLowE => "triple_lowE",
    }
}

impl WindowGlazing {
    /// (U-factor in Btu/h·ft²·°F, SHGC); the baseline is U-0.59 SHGC-0.40.
    pub fn properties(self) -> Option<(f64, f64)> {
        match self {
            WindowGlazing::Baseline => None,
            WindowGlazing::DoubleClearLowE => Some((0.32, 0.40)),
            WindowGlazing::DoubleTintedLowE => Some((0.30, 0.30)),
            WindowGlazing::TripleLowE => Some((0.20, 0.25)),
        }
    }
}

choice_enum! {
    /// Air leakage, cfm per ft² of envelope area.
    AirLeakage {
        Baseline => "1.00",
        L090 => "0.90",
        L075 => "0.75",
        L060 => "0.60",
        L040 => "0.40",
    }
}

impl AirLeakage {
    pub fn cfm_per_ft2(self) -> Option<f64> {
        match self {
            AirLeakage::Baseline => None,
            AirLeakage::L090 => Some(0.90),
            AirLeakage::L075 => Some(0.75),
            AirLeakage::L060 => Some(0.60),
            AirLeakage::L040 => Some(0.40),
        }
    }
}

fn insulate(
    model: &mut BuildingModel,
    ctx: &mut RetrofitContext<'_>,
    target: OpaqueTarget,
    r_ip: Option<f64>,
    surface_label: &str,
) -> Result<Outcome> {
    let Some(r_ip) = r_ip else {
        return Ok(Outcome::Unchanged(format!("No change made to {surface_label} insulation.")));
    };

    let result = apply_opaque_insulation(model, target, r_ip, ctx.units)?;
    if result.surfaces == 0 {
        // Reported as an error but not fatal for the run.
        ctx.sink.error(&format!("No {surface_label}s found in the model."));
        return Ok(Outcome::Unchanged(format!("No change made to {surface_label} insulation.")));
    }
    mark_for_sizing(model);
    Ok(Outcome::Applied(format!(
        "Applied R-{r_ip} insulation ({:.2} SI) to {} {surface_label}s.",
        result.r_si.as_si(),
        result.surfaces
    )))
}

#[derive(Debug, Clone, Copy)]
pub struct WallInsulation {
    pub choice: WallRValue,
}

impl Measure for WallInsulation {
    fn name(&self) -> &'static str {
        "Upgrade Wall Insulation"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        insulate(model, ctx, OpaqueTarget::ExteriorWall, self.choice.r_ip(), "exterior wall")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoofInsulation {
    pub choice: RoofRValue,
}

impl Measure for RoofInsulation {
    fn name(&self) -> &'static str {
        "Upgrade Roof Insulation"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        insulate(model, ctx, OpaqueTarget::Roof, self.choice.r_ip(), "roof")
    }
}

fn glaze(
    model: &mut BuildingModel,
    ctx: &mut RetrofitContext<'_>,
    property: GlazingProperty,
    description: String,
) -> Result<Outcome> {
    let windows = set_window_glazing(model, property, ctx.units)?;
    if windows == 0 {
        ctx.sink.error("No windows found in the model.");
        return Ok(Outcome::Unchanged("No windows were updated.".into()));
    }
    mark_for_sizing(model);
    Ok(Outcome::Applied(format!("Updated {windows} windows to {description}.")))
}

#[derive(Debug, Clone, Copy)]
pub struct WindowUValue {
    pub choice: WindowUValueChoice,
}

impl Measure for WindowUValue {
    fn name(&self) -> &'static str {
        "Upgrade Window U-Value"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        match self.choice.u_ip() {
            None => Ok(Outcome::Unchanged("No change made to window U-value.".into())),
            Some(u) => glaze(model, ctx, GlazingProperty::UFactorIp(u), format!("U-{u}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WindowShgc {
    pub choice: WindowShgcValue,
}

impl Measure for WindowShgc {
    fn name(&self) -> &'static str {
        "Upgrade Window SHGC"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        match self.choice.shgc() {
            None => Ok(Outcome::Unchanged("No change made to window SHGC.".into())),
            Some(g) => glaze(model, ctx, GlazingProperty::Shgc(g), format!("SHGC of {g}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WindowConstruction {
    pub choice: WindowGlazing,
}

impl Measure for WindowConstruction {
    fn name(&self) -> &'static str {
        "Upgrade Window Construction"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        let Some((u_ip, shgc)) = self.choice.properties() else {
            return Ok(Outcome::Unchanged("No change made to window construction.".into()));
        };

        let windows = replace_window_construction(model, u_ip, shgc, ctx.units)?;
        if windows == 0 {
            return Ok(Outcome::Unchanged("No windows found in the model.".into()));
        }
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Updated {windows} windows to {} (U-{u_ip}, SHGC-{shgc}).",
            self.choice
        )))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InfiltrationRate {
    pub choice: AirLeakage,
}

impl Measure for InfiltrationRate {
    fn name(&self) -> &'static str {
        "Adjust Infiltration Rates"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        let Some(rate) = self.choice.cfm_per_ft2() else {
            return Ok(Outcome::Unchanged("No change made to air leakage rate.".into()));
        };

        let result = set_infiltration_rate(model, rate, ctx.units)?;
        if result.perimeter_spaces == 0 {
            return Ok(Outcome::NotApplicable(
                "No perimeter (exterior) spaces found in the model.".into(),
            ));
        }
        if result.objects_updated == 0 {
            ctx.sink.warn(
                "No infiltration objects found in perimeter spaces. Consider adding infiltration objects to spaces.",
            );
            return Ok(Outcome::Unchanged("No infiltration objects were updated.".into()));
        }
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Updated infiltration rate to {} cfm/ft² for {} infiltration objects.",
            self.choice, result.objects_updated
        )))
    }
}
