//! SmashForm CLI - overhead smash analysis over pose JSON files
//!
//! Loads the configuration and reference profile once, then analyses each
//! input clip on a bounded pool of blocking workers.

mod batch;
mod cli;
mod config;
mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use smash_analysis::SmashAnalyzer;
use smash_core::DominantHand;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::batch::{BatchRunner, ClipJob};
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate()?;

    match cli.command {
        Commands::Analyze {
            input,
            hand,
            fps,
            output,
        } => run_analyze(&config, input, hand, fps, output).await,
        Commands::Reference => run_reference(&config),
        Commands::Config => run_config(&config),
    }
}

async fn run_analyze(
    config: &AppConfig,
    inputs: Vec<PathBuf>,
    hand: Option<DominantHand>,
    fps: Option<f64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let profile = Arc::new(config.load_profile()?);
    let analyzer = Arc::new(SmashAnalyzer::new(config.analysis.clone(), profile)?);
    let runner = BatchRunner::new(analyzer, config.workers);

    let mut jobs = Vec::with_capacity(inputs.len());
    for path in &inputs {
        jobs.push(ClipJob {
            label: path.display().to_string(),
            request: input::load_request(path, hand, fps).await,
        });
    }

    info!(clips = jobs.len(), workers = config.workers, "analysing clips");
    let outcomes = runner.run(jobs).await?;

    if let Some(dir) = &output {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    }

    for (path, outcome) in inputs.iter().zip(&outcomes) {
        let json = serde_json::to_string_pretty(outcome)?;
        match &output {
            Some(dir) => {
                let target = result_path(dir, path);
                tokio::fs::write(&target, json)
                    .await
                    .with_context(|| format!("cannot write {}", target.display()))?;
                info!(clip = %outcome.clip, output = %target.display(), "wrote result");
            }
            None => println!("{}", json),
        }
    }

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "some clips could not be analysed");
        anyhow::bail!("{} of {} clips failed", failed, outcomes.len());
    }
    Ok(())
}

/// `<dir>/<input stem>.result.json`
fn result_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());
    dir.join(format!("{}.result.json", stem))
}

fn run_reference(config: &AppConfig) -> anyhow::Result<()> {
    let profile = config.load_profile()?;
    println!("{}", serde_json::to_string_pretty(&profile.catalogue())?);
    Ok(())
}

fn run_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_path_uses_stem() {
        let path = result_path(Path::new("out"), Path::new("clips/smash_01.json"));
        assert_eq!(path, PathBuf::from("out/smash_01.result.json"));
    }
}
