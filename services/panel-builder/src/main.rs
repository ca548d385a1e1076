//! Forecast panel builder service.
//!
//! Runs each configured job once:
//! - Loads the job's background canvases
//! - Resolves the latest issuance time of every model feed it uses
//! - Downloads, filters and composites the charts in configured order
//! - Writes one PNG per canvas to the output directory

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use panel_builder::{load_job_configs, HttpChartSource, JobRunner};

#[derive(Parser, Debug)]
#[command(name = "panel-builder")]
#[command(about = "Composite NWP forecast charts onto background panels")]
struct Args {
    /// Configuration directory (contains jobs/*.yaml)
    #[arg(long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Job to run; may be repeated (default: all enabled jobs)
    #[arg(short, long)]
    job: Vec<String>,

    /// Directory for composited panels
    #[arg(long, env = "OUTPUT_DIR", default_value = "outputs/Output")]
    output_dir: PathBuf,

    /// Maximum concurrent chart downloads
    #[arg(long, default_value = "4")]
    max_concurrent: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    pretty_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true);
    if args.pretty_logs {
        tracing::subscriber::set_global_default(builder.finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    }

    info!("Starting forecast panel builder");

    tokio::fs::create_dir_all(&args.output_dir).await?;

    let mut jobs = load_job_configs(&args.config_dir)?;
    if !args.job.is_empty() {
        for wanted in &args.job {
            if !jobs.iter().any(|j| &j.job.id == wanted) {
                bail!("Job {:?} not found in {}", wanted, args.config_dir.display());
            }
        }
        jobs.retain(|j| args.job.contains(&j.job.id));
    }
    if jobs.is_empty() {
        warn!(config_dir = %args.config_dir.display(), "No jobs to run");
        return Ok(());
    }

    let mut failed_jobs = Vec::new();
    for job in &jobs {
        let source = Arc::new(HttpChartSource::new(&job.fetch)?);
        let runner = JobRunner::new(source, args.output_dir.clone(), args.max_concurrent);

        match runner.run(job).await {
            Ok(report) => {
                if !report.failed_outputs.is_empty() {
                    failed_jobs.push(job.job.id.clone());
                }
                info!(
                    job = %report.job,
                    composited = report.composited(),
                    skipped = report.skipped(),
                    failed = report.failed(),
                    outputs = ?report.outputs,
                    "Job finished"
                );
            }
            Err(e) => {
                error!(job = %job.job.id, kind = e.kind(), error = %e, "Job aborted");
                failed_jobs.push(job.job.id.clone());
            }
        }
    }

    if !failed_jobs.is_empty() {
        bail!("Jobs did not complete: {}", failed_jobs.join(", "));
    }

    info!("All jobs complete");
    Ok(())
}
