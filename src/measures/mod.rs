//! Top-level measures: one user-facing option selector each.
//!
//! A measure turns an already-typed choice into model edits from
//! [`crate::retrofit`] and reports what happened through the
//! [`MessageSink`]. [`run`] is the entry point callers use; it maps any
//! [`RetrofitError`] to `false`.

pub mod dhw;
pub mod envelope;
pub mod erv;
pub mod hvac;

pub use dhw::{DhwChoice, DhwHeatPump};
pub use envelope::{
    AirLeakage, InfiltrationRate, RoofInsulation, RoofRValue, WallInsulation, WallRValue,
    WindowConstruction, WindowGlazing, WindowShgc, WindowShgcValue, WindowUValue, WindowUValueChoice,
};
pub use erv::{ErvChoice, InUnitErv};
pub use hvac::{BoilerChoice, CondensingBoiler, HvacChoice, HvacSystemChoice, PackagedHeatPump, PackagedHpChoice};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::BuildingModel;
use crate::error::{Result, RetrofitError};
use crate::messages::MessageSink;
use crate::units::UnitConverter;

/// Collaborators a measure talks to while it runs.
pub struct RetrofitContext<'a> {
    pub units: &'a dyn UnitConverter,
    pub sink: &'a mut dyn MessageSink,
}

impl<'a> RetrofitContext<'a> {
    pub fn new(units: &'a dyn UnitConverter, sink: &'a mut dyn MessageSink) -> Self {
        Self { units, sink }
    }
}

/// Result of a measure that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    /// The model was changed.
    Applied(String),
    /// Nothing in the model qualified for the measure.
    NotApplicable(String),
    /// The baseline option was selected.
    Unchanged(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Applied(m) | Outcome::NotApplicable(m) | Outcome::Unchanged(m) => m,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub trait Measure {
    fn name(&self) -> &'static str;

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome>;
}

/// Apply `measure` and report its outcome. `false` means a fatal failure
/// the user has to see; baseline and not-applicable runs return `true`.
pub fn run(measure: &dyn Measure, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> bool {
    run_with_outcome(measure, model, ctx).is_ok()
}

/// Like [`run`] but hands back the outcome or the error for reporting.
pub fn run_with_outcome(
    measure: &dyn Measure,
    model: &mut BuildingModel,
    ctx: &mut RetrofitContext<'_>,
) -> Result<Outcome> {
    match measure.apply(model, ctx) {
        Ok(outcome) => {
            match &outcome {
                Outcome::Applied(m) => ctx.sink.register_final_condition(m),
                Outcome::NotApplicable(m) => ctx.sink.register_not_applicable(m),
                Outcome::Unchanged(m) => ctx.sink.info(m),
            }
            Ok(outcome)
        }
        Err(e) => {
            ctx.sink.error(&format!("{}: {e}", measure.name()));
            Err(e)
        }
    }
}

/// Parse a choice label such as `"R-20"` or `"Mini-Split"`.
pub fn parse_choice<T: FromStr>(measure: &str, value: &str) -> Result<T> {
    T::from_str(value.trim()).map_err(|_| RetrofitError::InvalidSelection {
        measure: measure.to_string(),
        value: value.to_string(),
    })
}
