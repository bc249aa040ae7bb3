use anyhow::{Context, Result};
use building_retrofit::{config, messages::TracingSink, telemetry, units::StandardUnits, BuildingModel};
use config::Config;
use std::fs;
use std::path::Path;
use telemetry::init_tracing;
use tracing::{info, warn};

/// Usage: `building-retrofit [measure=choice ...]`. Pairs on the command line
/// override the `[selection]` section of the configuration.
fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let mut workflow = cfg.workflow();
    for arg in std::env::args().skip(1) {
        let Some((key, label)) = arg.split_once('=') else {
            anyhow::bail!("expected measure=choice, got '{arg}'");
        };
        workflow.selection.set(key.trim(), label)?;
    }

    let path = &cfg.workflow.model_path;
    let raw = fs::read_to_string(path).with_context(|| format!("reading model {}", path.display()))?;
    let mut model: BuildingModel =
        serde_json::from_str(&raw).with_context(|| format!("parsing model {}", path.display()))?;

    info!(model = %model.name, measures = workflow.measures().len(), "starting retrofit");
    let report = workflow.run(&mut model, &StandardUnits, &mut TracingSink);

    write_json(&cfg.workflow.output_path, &model)?;
    if let Some(report_path) = &cfg.workflow.report_path {
        write_json(report_path, &report)?;
    }

    if !report.success {
        warn!(applied = report.succeeded(), "retrofit stopped on a failed measure");
        anyhow::bail!("retrofit of '{}' failed", report.model);
    }
    info!(applied = report.succeeded(), "retrofit complete");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
