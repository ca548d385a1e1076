//! Job orchestration.
//!
//! A job run loads every canvas, resolves issuance times once per feed,
//! then walks the units in configured order. Chart downloads for upcoming
//! units overlap, but composites are applied one at a time in unit order,
//! so later units paint over earlier ones. Each canvas is saved exactly once
//! at the end, whatever happened to its units.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use compositor::{composite, declare_transparent, load_overlay, Placement};
use futures::stream::{self, StreamExt};
use image::RgbaImage;
use panel_common::{IssuanceTime, PanelError, PanelResult};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{JobConfig, OverlaySource, UnitConfig};
use crate::fetch::{fetch_chart_image, fetch_issuance, ChartSource};
use crate::router::CanvasSet;

/// What happened to one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Composited,
    /// The model publishes no chart for this day.
    Skipped { reason: String },
    Failed { kind: &'static str, message: String },
}

/// Per-unit outcomes and saved files of one job run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub job: String,
    pub units: Vec<(String, UnitOutcome)>,
    pub outputs: Vec<PathBuf>,
    pub failed_outputs: Vec<(String, String)>,
}

impl RunReport {
    pub fn composited(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Composited))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Failed { .. }))
    }

    pub fn outcome(&self, unit: &str) -> Option<&UnitOutcome> {
        self.units.iter().find(|(name, _)| name == unit).map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|(_, o)| pred(o)).count()
    }
}

type IssuanceMap = HashMap<String, Result<IssuanceTime, String>>;

/// Result of the download/prepare stage of a unit.
enum Prepared {
    Overlay(RgbaImage),
    Skip(String),
}

/// Runs panel jobs against a chart source.
pub struct JobRunner {
    source: Arc<dyn ChartSource>,
    output_dir: PathBuf,
    max_concurrent: usize,
}

impl JobRunner {
    pub fn new(source: Arc<dyn ChartSource>, output_dir: PathBuf, max_concurrent: usize) -> Self {
        Self {
            source,
            output_dir,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run one job.
    ///
    /// Only a missing background is an error here; unit failures end up
    /// in the report.
    #[instrument(skip_all, fields(job = %job.job.id))]
    pub async fn run(&self, job: &JobConfig) -> PanelResult<RunReport> {
        let mut canvases = CanvasSet::load(job)?;
        info!(canvases = job.canvases.len(), units = job.units.len(), "Starting job");

        let issuances = Arc::new(self.resolve_issuances(job).await);
        let base_url: Arc<str> = Arc::from(job.fetch.base_url.as_str());

        let mut report = RunReport {
            job: job.job.id.clone(),
            ..Default::default()
        };

        // Preparation runs on spawned tasks and continues during composites.
        let mut prepared = stream::iter(job.units.iter())
            .map(|unit| {
                let task = tokio::spawn(prepare(
                    self.source.clone(),
                    unit.clone(),
                    base_url.clone(),
                    issuances.clone(),
                ));
                async move {
                    let result = task.await.unwrap_or_else(|e| {
                        Err(PanelError::fetch(unit.label(), format!("prepare task failed: {}", e)))
                    });
                    (unit, result)
                }
            })
            .buffered(self.max_concurrent);

        while let Some((unit, result)) = prepared.next().await {
            let label = unit.label();
            let outcome = match result {
                Ok(Prepared::Overlay(overlay)) => {
                    let result = match canvases.route(unit) {
                        Ok(canvas) => composite_blocking(canvas, overlay, unit.placement()).await,
                        Err(e) => Err(e),
                    };
                    match result {
                        Ok(()) => {
                            info!(unit = %label, canvas = %unit.canvas, "Composited overlay");
                            remove_consumed_overlay(unit).await;
                            UnitOutcome::Composited
                        }
                        Err(e) => failed(&label, e),
                    }
                }
                Ok(Prepared::Skip(reason)) => {
                    info!(unit = %label, reason = %reason, "Skipping unit");
                    UnitOutcome::Skipped { reason }
                }
                Err(e) => failed(&label, e),
            };
            report.units.push((label, outcome));
        }
        drop(prepared);

        for (canvas, result) in canvases.save_all(&self.output_dir) {
            match result {
                Ok(path) => report.outputs.push(path),
                Err(e) => {
                    error!(canvas = %canvas, error = %e, "Failed to save canvas");
                    report.failed_outputs.push((canvas, e.to_string()));
                }
            }
        }

        info!(
            composited = report.composited(),
            skipped = report.skipped(),
            failed = report.failed(),
            outputs = report.outputs.len(),
            "Job complete"
        );
        Ok(report)
    }

    /// Fetch the issuance time of every feed the job's models use, once each.
    async fn resolve_issuances(&self, job: &JobConfig) -> IssuanceMap {
        let mut feeds: Vec<String> = Vec::new();
        for unit in &job.units {
            if let OverlaySource::Model { model, .. } = &unit.source {
                let feed = model.feed_url(&job.fetch.base_url);
                if !feeds.contains(&feed) {
                    feeds.push(feed);
                }
            }
        }

        let source = self.source.as_ref();
        let resolved = stream::iter(feeds)
            .map(|feed| async move {
                let result = fetch_issuance(source, &feed).await.map_err(|e| {
                    warn!(feed = %feed, error = %e, "Could not resolve issuance time");
                    e.to_string()
                });
                (feed, result)
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        resolved.into_iter().collect()
    }
}

/// Produce the overlay for one unit, or decide to skip it.
async fn prepare(
    source: Arc<dyn ChartSource>,
    unit: UnitConfig,
    base_url: Arc<str>,
    issuances: Arc<IssuanceMap>,
) -> PanelResult<Prepared> {
    let threshold = unit.filter_threshold();
    match &unit.source {
        OverlaySource::Model { model, day } => {
            let feed = model.feed_url(&base_url);
            let issuance = match issuances.get(&feed) {
                Some(Ok(issuance)) => issuance,
                Some(Err(reason)) => return Err(PanelError::fetch(feed, reason)),
                None => return Err(PanelError::fetch(feed, "issuance time not resolved")),
            };

            let Some(step) = model.step_rule().resolve(issuance, *day) else {
                return Ok(Prepared::Skip(format!(
                    "{} has no chart for day {} from the {} run",
                    model, day, issuance
                )));
            };

            let url = model.image_url(&base_url, issuance, &step);
            debug!(unit = %unit.label(), url = %url, threshold = ?threshold, "Fetching chart");
            let image = fetch_chart_image(source.as_ref(), &url, threshold).await?;
            Ok(Prepared::Overlay(image))
        }
        OverlaySource::File { path, .. } => {
            let path = path.clone();
            tokio::task::spawn_blocking(move || -> PanelResult<Prepared> {
                let mut image = load_overlay(&path)?;
                if let Some(threshold) = threshold {
                    declare_transparent(&mut image, threshold);
                }
                Ok(Prepared::Overlay(image))
            })
            .await
            .map_err(|e| PanelError::CompositeFailed(format!("overlay load task failed: {}", e)))?
        }
    }
}

/// Run [`composite`] on the blocking pool.
///
/// The canvas is moved into the task and handed back with the result, so it
/// is unchanged whenever the composite itself fails.
async fn composite_blocking(canvas: &mut RgbaImage, overlay: RgbaImage, placement: Placement) -> PanelResult<()> {
    let mut owned = std::mem::take(canvas);
    let (owned, result) = tokio::task::spawn_blocking(move || {
        let result = composite(&mut owned, &overlay, &placement);
        (owned, result)
    })
    .await
    .map_err(|e| PanelError::CompositeFailed(format!("composite task failed: {}", e)))?;
    *canvas = owned;
    result
}

/// Delete a file overlay marked `remove_after` once it is on the canvas.
async fn remove_consumed_overlay(unit: &UnitConfig) {
    if let OverlaySource::File { path, remove_after: true } = &unit.source {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "Removed consumed overlay"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove overlay"),
        }
    }
}

fn failed(label: &str, e: PanelError) -> UnitOutcome {
    warn!(unit = %label, kind = e.kind(), error = %e, "Unit failed");
    UnitOutcome::Failed {
        kind: e.kind(),
        message: e.to_string(),
    }
}
