use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::pipeline::{PipelineConfig, StageConfig};

/// Runs one stage to completion, inheriting stdio so the external tool's
/// own progress output stays visible.
pub fn run_stage(config: &PipelineConfig, stage: &StageConfig) -> Result<()> {
    let now = Instant::now();
    log::info!("stage {}: {} {}", stage.name, stage.program, stage.args.join(" "));

    let mut command = Command::new(&stage.program);
    command
        .args(&stage.args)
        .env("DATA_DIR", &config.data_dir)
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .envs(&stage.env);
    if let Some(cwd) = &stage.cwd {
        command.current_dir(cwd);
    }

    let status = command
        .status()
        .with_context(|| format!("spawning {} for stage {}", stage.program, stage.name))?;
    if !status.success() {
        anyhow::bail!("stage {} failed with {status}", stage.name);
    }

    log::info!("stage {} finished in {:.2?}", stage.name, now.elapsed());
    Ok(())
}

/// Runs the configured stages in order. `only` restricts the run to the
/// named stages; an unknown name is an error rather than a silent no-op.
/// A failing stage aborts the pipeline, there is no retry or recovery.
pub fn run_pipeline(config: &PipelineConfig, only: &[String]) -> Result<()> {
    for wanted in only {
        anyhow::ensure!(
            config.stages.iter().any(|stage| stage.name == *wanted),
            "no stage named {wanted:?} in pipeline config"
        );
    }

    for stage in &config.stages {
        if !only.is_empty() && !only.contains(&stage.name) {
            log::debug!("skipping stage {}", stage.name);
            continue;
        }
        run_stage(config, stage)?;
    }
    Ok(())
}
