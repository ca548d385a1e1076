//! Job configuration.
//!
//! Loads panel jobs from YAML files in `config/jobs/`. A job names the
//! background canvases it paints on and the ordered list of units
//! (one overlay each) composited onto them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use compositor::{Placement, DEFAULT_WHITE_THRESHOLD};
use panel_common::{ForecastModel, PanelError, PanelResult, Rect, DEFAULT_BASE_URL};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Root configuration loaded from a job YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub job: JobInfo,
    #[serde(default)]
    pub fetch: FetchSettings,
    pub canvases: Vec<CanvasConfig>,
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// Basic job identification.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Upstream chart service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for chart image requests
    #[serde(default = "default_image_timeout")]
    pub image_timeout_secs: u64,
    /// Timeout for issuance-time feed requests
    #[serde(default = "default_feed_timeout")]
    pub feed_timeout_secs: u64,
    /// The upstream service presents a self-signed certificate.
    #[serde(default = "default_enabled")]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_image_timeout() -> u64 {
    15
}

fn default_feed_timeout() -> u64 {
    10
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_timeout_secs: default_image_timeout(),
            feed_timeout_secs: default_feed_timeout(),
            accept_invalid_certs: true,
        }
    }
}

/// One output panel: a background file and where the result is written.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    pub id: String,
    pub background: PathBuf,
    /// File name inside the output directory
    pub output: String,
}

/// Where a unit's overlay comes from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlaySource {
    /// A chart published by a forecast model for a day offset.
    Model { model: ForecastModel, day: u32 },
    /// An overlay rendered to disk by another tool.
    File {
        path: PathBuf,
        /// Delete the file once it has been composited.
        #[serde(default)]
        remove_after: bool,
    },
}

/// One overlay composited onto one canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub canvas: String,
    pub source: OverlaySource,
    /// Near-white cut-off. Model charts default to
    /// [`DEFAULT_WHITE_THRESHOLD`]; file overlays are only filtered when set.
    #[serde(default)]
    pub white_threshold: Option<u8>,
    pub layout: Rect,
    #[serde(default)]
    pub keep_region: Option<Rect>,
    #[serde(default)]
    pub masks: Vec<Rect>,
}

impl UnitConfig {
    /// Name used in logs and the run report.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match &self.source {
            OverlaySource::Model { model, day } => format!("{} day {}", model, day),
            OverlaySource::File { path, .. } => path.display().to_string(),
        }
    }

    /// Threshold the white filter runs with, or `None` to leave the overlay
    /// as loaded.
    pub fn filter_threshold(&self) -> Option<u8> {
        match &self.source {
            OverlaySource::Model { .. } => Some(self.white_threshold.unwrap_or(DEFAULT_WHITE_THRESHOLD)),
            OverlaySource::File { .. } => self.white_threshold,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            layout: self.layout,
            keep_region: self.keep_region,
            masks: self.masks.clone(),
        }
    }
}

impl JobConfig {
    /// Load a job configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!(job = %config.job.id, path = %path.display(), "Loaded job config");
        Ok(config)
    }

    /// Parse and validate a job from YAML text.
    pub fn from_yaml(content: &str) -> PanelResult<Self> {
        let config: JobConfig =
            serde_yaml::from_str(content).map_err(|e| PanelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PanelResult<()> {
        if self.canvases.is_empty() {
            return Err(PanelError::Config(format!("job {}: no canvases", self.job.id)));
        }

        let mut ids = HashSet::new();
        for canvas in &self.canvases {
            if !ids.insert(canvas.id.as_str()) {
                return Err(PanelError::Config(format!(
                    "job {}: duplicate canvas id {:?}",
                    self.job.id, canvas.id
                )));
            }
        }

        for unit in &self.units {
            let label = unit.label();
            if !ids.contains(unit.canvas.as_str()) {
                return Err(PanelError::Config(format!(
                    "unit {}: unknown canvas {:?}",
                    label, unit.canvas
                )));
            }
            if let OverlaySource::Model { day: 0, .. } = unit.source {
                return Err(PanelError::Config(format!("unit {}: day must be >= 1", label)));
            }
            unit.layout.validate(&format!("unit {} layout", label))?;
            if let Some(keep) = &unit.keep_region {
                keep.validate(&format!("unit {} keep_region", label))?;
            }
            for mask in &unit.masks {
                mask.validate(&format!("unit {} mask", label))?;
            }
        }
        Ok(())
    }

    /// Units routed to `canvas_id`, in configured order.
    pub fn units_for<'a>(&'a self, canvas_id: &'a str) -> impl Iterator<Item = &'a UnitConfig> + 'a {
        self.units.iter().filter(move |u| u.canvas == canvas_id)
    }
}

/// Load all enabled job configurations from a directory.
pub fn load_job_configs(config_dir: &Path) -> Result<Vec<JobConfig>> {
    let jobs_dir = config_dir.join("jobs");

    if !jobs_dir.exists() {
        warn!(path = %jobs_dir.display(), "Jobs config directory not found");
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&jobs_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    paths.sort();

    let mut configs = Vec::new();
    for path in paths {
        match JobConfig::load(&path) {
            Ok(config) => {
                if config.job.enabled {
                    info!(
                        job = %config.job.id,
                        name = %config.job.name,
                        units = config.units.len(),
                        "Loaded job configuration"
                    );
                    configs.push(config);
                } else {
                    debug!(job = %config.job.id, "Skipping disabled job");
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{:#}", e), "Failed to load job config");
            }
        }
    }

    info!(count = configs.len(), "Loaded job configurations");
    Ok(configs)
}
