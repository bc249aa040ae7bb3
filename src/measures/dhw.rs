use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Measure, Outcome, RetrofitContext};
use crate::domain::BuildingModel;
use crate::error::Result;
use crate::retrofit::{mark_for_sizing, replace_water_heating, WaterHeaterSizing};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum DhwChoice {
    #[default]
    Baseline,
    Upgrade,
}

/// Swap the DHW loop's water heaters for one heat pump water heater placed
/// in the corridor.
#[derive(Debug, Clone)]
pub struct DhwHeatPump {
    pub choice: DhwChoice,
    pub sizing: WaterHeaterSizing,
}

impl DhwHeatPump {
    pub fn new(choice: DhwChoice) -> Self {
        Self {
            choice,
            sizing: WaterHeaterSizing::default(),
        }
    }
}

impl Measure for DhwHeatPump {
    fn name(&self) -> &'static str {
        "Upgrade DHW to HPWH"
    }

    fn apply(&self, model: &mut BuildingModel, ctx: &mut RetrofitContext<'_>) -> Result<Outcome> {
        if self.choice == DhwChoice::Baseline {
            return Ok(Outcome::Unchanged("No change made to domestic hot water.".into()));
        }

        let unit = replace_water_heating(model, &self.sizing, ctx.units)?;
        ctx.sink.info(&format!(
            "{} rated at {} with {} backup.",
            unit.name, unit.rated_capacity, unit.backup_capacity
        ));
        mark_for_sizing(model);
        Ok(Outcome::Applied(format!(
            "Replaced water heating on the '{}' loop with a {} kW, COP {} heat pump water heater.",
            self.sizing.loop_pattern, self.sizing.capacity_kw, self.sizing.cop
        )))
    }
}
