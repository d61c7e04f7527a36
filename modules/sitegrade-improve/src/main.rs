use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitegrade_assess::AssessmentEngine;
use sitegrade_common::{AssessmentConfig, SessionConfig, StaticRenderer, WebsiteArtifact};
use sitegrade_improve::report;
use sitegrade_improve::{FixerRegistry, ImprovementEngine};

#[derive(Parser)]
#[command(name = "sitegrade", about = "Quality assessment and auto-improvement for generated sites")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score an artifact once and print the report.
    Assess {
        /// Path to a WebsiteArtifact JSON file.
        artifact: PathBuf,
    },
    /// Run the full improvement loop against an artifact.
    Improve {
        /// Path to a WebsiteArtifact JSON file.
        artifact: PathBuf,
        #[arg(long, default_value_t = 75.0)]
        target_score: f32,
        #[arg(long, default_value_t = 7.0)]
        min_category_score: f32,
        #[arg(long, default_value_t = 10)]
        max_iterations: u32,
        /// Where to write the improved artifact (default: alongside the
        /// input with an `.improved.json` suffix).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_artifact(path: &PathBuf) -> Result<WebsiteArtifact> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse artifact JSON in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sitegrade=info".parse()?))
        .init();

    let cli = Cli::parse();
    let assessor = AssessmentEngine::new(Arc::new(StaticRenderer), AssessmentConfig::default())?;
    let engine = ImprovementEngine::new(assessor, FixerRegistry::with_defaults());

    match cli.command {
        Command::Assess { artifact } => {
            let artifact = load_artifact(&artifact)?;
            let assessment = engine.assess(&artifact).await?;
            let path = report::save_assessment_report(&assessment, artifact.id)?;
            println!("{}", report::render_assessment_markdown(&assessment));
            info!(report = %path.display(), "Done");
        }
        Command::Improve {
            artifact: artifact_path,
            target_score,
            min_category_score,
            max_iterations,
            out,
        } => {
            let mut artifact = load_artifact(&artifact_path)?;
            let config = SessionConfig::builder()
                .target_score(target_score)
                .min_category_score(min_category_score)
                .max_iterations(max_iterations)
                .build();

            let session = engine.improve(&mut artifact, &config).await?;
            let report_path = report::save_session_report(&session)?;
            println!("{}", report::render_session_markdown(&session));

            let out = out.unwrap_or_else(|| artifact_path.with_extension("improved.json"));
            std::fs::write(&out, serde_json::to_string_pretty(&artifact)?)
                .with_context(|| format!("Failed to write improved artifact to {}", out.display()))?;
            info!(
                artifact = %out.display(),
                report = %report_path.display(),
                "Done"
            );
        }
    }
    Ok(())
}
