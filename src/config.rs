use anyhow::{Context, Result};
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;
use validator::Validate;

use crate::retrofit::{VentilationSpec, WaterHeaterSizing};
use crate::workflow::{MeasureSelection, Workflow};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub selection: MeasureSelection,
    #[serde(default)]
    pub ventilation: VentilationSpec,
    #[serde(default)]
    pub water_heating: WaterHeaterSizing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Seed model, JSON.
    pub model_path: PathBuf,
    /// Where the retrofitted model is written.
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("RETROFIT__").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.ventilation.validate().context("invalid [ventilation] section")?;
        cfg.water_heating.validate().context("invalid [water_heating] section")?;
        Ok(cfg)
    }

    pub fn workflow(&self) -> Workflow {
        Workflow {
            selection: self.selection.clone(),
            ventilation: self.ventilation.clone(),
            water_heating: self.water_heating.clone(),
        }
    }
}
