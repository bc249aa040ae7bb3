use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Measure, Outcome, RetrofitContext};
use crate::domain::BuildingModel;
use crate::error::Result;
use crate::retrofit::{install_ventilation, mark_for_sizing, VentilationSpec};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ErvChoice {
    #[default]
    #[serde(rename = "No ERV")]
    #[strum(serialize = "No ERV")]
    NoErv,
    #[serde(rename = "Add ERV")]
    #[strum(serialize = "Add ERV")]
    AddErv,
}

/// Add an in-unit ERV to every apartment that lacks one.
#[derive(Debug, Clone)]
pub struct InUnitErv {
    pub choice: ErvChoice,
    pub spec: VentilationSpec,
}

impl InUnitErv {
    pub fn new(choice: ErvChoice) -> Self {
        Self {
            choice,
            spec: VentilationSpec::default(),
        }
    }
}

impl Measure for InUnitErv {
    fn name(&self) -> &'static str {
        "Add In-Unit ERV"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        if self.choice == ErvChoice::NoErv {
            return Ok(Outcome::Unchanged("ERV not added.".into()));
        }

        let added = install_ventilation(model, &self.spec, ctx.units)?;
        if added == 0 {
            return Ok(Outcome::NotApplicable(format!(
                "No zones matching '{}' without an ERV were found.",
                self.spec.zone_pattern
            )));
        }
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!("Added ERVs to {added} zones.")))
    }
}
