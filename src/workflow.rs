//! Ordered application of the selected measures to one model.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::BuildingModel;
use crate::error::{Result, RetrofitError};
use crate::measures::{
    self, parse_choice, AirLeakage, BoilerChoice, CondensingBoiler, DhwChoice, DhwHeatPump,
    ErvChoice, HvacChoice, HvacSystemChoice, InUnitErv, InfiltrationRate, Measure, PackagedHeatPump,
    PackagedHpChoice, RetrofitContext, RoofInsulation, RoofRValue, WallInsulation, WallRValue,
    WindowConstruction, WindowGlazing, WindowShgc, WindowShgcValue, WindowUValue, WindowUValueChoice,
};
use crate::messages::{Message, MessageSink, RecordingSink};
use crate::retrofit::{VentilationSpec, WaterHeaterSizing};
use crate::units::UnitConverter;

/// One optional choice per measure; unset measures are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSelection {
    pub wall_insulation: Option<WallRValue>,
    pub roof_insulation: Option<RoofRValue>,
    pub window_u_value: Option<WindowUValueChoice>,
    pub window_shgc: Option<WindowShgcValue>,
    pub window_construction: Option<WindowGlazing>,
    pub infiltration: Option<AirLeakage>,
    pub hvac_system: Option<HvacChoice>,
    pub condensing_boiler: Option<BoilerChoice>,
    pub packaged_heat_pump: Option<PackagedHpChoice>,
    pub in_unit_erv: Option<ErvChoice>,
    pub dhw: Option<DhwChoice>,
}

impl MeasureSelection {
    /// Set one choice from a `key=label` pair, e.g. `wall_insulation=R-20`.
    pub fn set(&mut self, key: &str, label: &str) -> Result<()> {
        match key {
            "wall_insulation" => self.wall_insulation = Some(parse_choice(key, label)?),
            "roof_insulation" => self.roof_insulation = Some(parse_choice(key, label)?),
            "window_u_value" => self.window_u_value = Some(parse_choice(key, label)?),
            "window_shgc" => self.window_shgc = Some(parse_choice(key, label)?),
            "window_construction" => self.window_construction = Some(parse_choice(key, label)?),
            "infiltration" => self.infiltration = Some(parse_choice(key, label)?),
            "hvac_system" => self.hvac_system = Some(parse_choice(key, label)?),
            "condensing_boiler" => self.condensing_boiler = Some(parse_choice(key, label)?),
            "packaged_heat_pump" => self.packaged_heat_pump = Some(parse_choice(key, label)?),
            "in_unit_erv" => self.in_unit_erv = Some(parse_choice(key, label)?),
            "dhw" => self.dhw = Some(parse_choice(key, label)?),
            _ => {
                return Err(RetrofitError::InvalidSelection {
                    measure: key.to_string(),
                    value: label.to_string(),
                })
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub measure: String,
    pub success: bool,
    pub outcome: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: bool,
    pub steps: Vec<StepReport>,
}

impl WorkflowReport {
    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| s.success).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workflow {
    pub selection: MeasureSelection,
    pub ventilation: VentilationSpec,
    pub water_heating: WaterHeaterSizing,
}

impl Workflow {
    pub fn new(selection: MeasureSelection) -> Self {
        Self {
            selection,
            ..Default::default()
        }
    }

    /// The selected measures in application order.
    pub fn measures(&self) -> Vec<Box<dyn Measure>> {
        let s = &self.selection;
        let mut out: Vec<Box<dyn Measure>> = Vec::new();
        if let Some(choice) = s.wall_insulation {
            out.push(Box::new(WallInsulation { choice }));
        }
        if let Some(choice) = s.roof_insulation {
            out.push(Box::new(RoofInsulation { choice }));
        }
        if let Some(choice) = s.window_u_value {
            out.push(Box::new(WindowUValue { choice }));
        }
        if let Some(choice) = s.window_shgc {
            out.push(Box::new(WindowShgc { choice }));
        }
        if let Some(choice) = s.window_construction {
            out.push(Box::new(WindowConstruction { choice }));
        }
        if let Some(choice) = s.infiltration {
            out.push(Box::new(InfiltrationRate { choice }));
        }
        if let Some(choice) = s.hvac_system {
            out.push(Box::new(HvacSystemChoice {
                choice,
                ventilation: self.ventilation.clone(),
            }));
        }
        if let Some(choice) = s.condensing_boiler {
            out.push(Box::new(CondensingBoiler { choice }));
        }
        if let Some(choice) = s.packaged_heat_pump {
            out.push(Box::new(PackagedHeatPump { choice }));
        }
        if let Some(choice) = s.in_unit_erv {
            out.push(Box::new(InUnitErv {
                choice,
                spec: self.ventilation.clone(),
            }));
        }
        if let Some(choice) = s.dhw {
            out.push(Box::new(DhwHeatPump {
                choice,
                sizing: self.water_heating.clone(),
            }));
        }
        out
    }

    /// Apply the selection in order, stopping at the first failing measure.
    /// Every message is forwarded to `sink` and also kept in the report.
    pub fn run(
        &self,
        model: &mut BuildingModel,
        units: &dyn UnitConverter,
        sink: &mut dyn MessageSink,
    ) -> WorkflowReport {
        let started_at = Utc::now();
        let mut steps = Vec::new();
        let mut success = true;

        let selected = self.measures();
        info!(
            model = %model.name,
            measures = %selected.iter().map(|m| m.name()).join(", "),
            "starting workflow"
        );
        for measure in selected {
            let mut recorder = RecordingSink::new();
            let result = {
                let mut ctx = RetrofitContext::new(units, &mut recorder);
                measures::run_with_outcome(measure.as_ref(), model, &mut ctx)
            };
            let messages = recorder.take();
            for m in &messages {
                forward(sink, m);
            }

            let (ok, outcome) = match result {
                Ok(outcome) => (true, outcome.to_string()),
                Err(e) => (false, e.to_string()),
            };
            steps.push(StepReport {
                measure: measure.name().to_string(),
                success: ok,
                outcome,
                messages,
            });
            if !ok {
                warn!(measure = measure.name(), "measure failed, stopping workflow");
                success = false;
                break;
            }
        }

        let report = WorkflowReport {
            model: model.name.clone(),
            started_at,
            finished_at: Utc::now(),
            success,
            steps,
        };
        info!(
            model = %report.model,
            steps = report.steps.len(),
            success = report.success,
            "workflow finished"
        );
        report
    }
}

fn forward(sink: &mut dyn MessageSink, message: &Message) {
    use crate::messages::MessageLevel::*;
    match message.level {
        Info => sink.info(&message.text),
        Warning => sink.warn(&message.text),
        Error => sink.error(&message.text),
        FinalCondition => sink.register_final_condition(&message.text),
        NotApplicable => sink.register_not_applicable(&message.text),
    }
}
