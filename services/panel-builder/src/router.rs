//! Canvas ownership and routing of units to canvases.

use std::path::{Path, PathBuf};

use compositor::{load_background, save_png};
use image::RgbaImage;
use panel_common::{PanelError, PanelResult};
use tracing::{info, warn};

use crate::config::{JobConfig, UnitConfig};

/// A background being painted for one output panel.
pub struct Canvas {
    pub id: String,
    pub output: String,
    pub image: RgbaImage,
}

/// All canvases of one job, loaded up front.
///
/// Units borrow a canvas mutably one at a time through [`CanvasSet::route`].
pub struct CanvasSet {
    canvases: Vec<Canvas>,
}

impl CanvasSet {
    /// Load every background of `job`.
    ///
    /// A missing background aborts the job before any network activity.
    pub fn load(job: &JobConfig) -> PanelResult<Self> {
        let mut canvases = Vec::with_capacity(job.canvases.len());
        for config in &job.canvases {
            let image = load_background(&config.background)?;
            canvases.push(Canvas {
                id: config.id.clone(),
                output: config.output.clone(),
                image,
            });
        }

        let set = Self { canvases };
        set.check_layouts(job);
        Ok(set)
    }

    /// Destination canvas of `unit`.
    pub fn route(&mut self, unit: &UnitConfig) -> PanelResult<&mut RgbaImage> {
        self.canvases
            .iter_mut()
            .find(|c| c.id == unit.canvas)
            .map(|c| &mut c.image)
            .ok_or_else(|| PanelError::Config(format!("unknown canvas {:?}", unit.canvas)))
    }

    /// Warn about layouts that do not fit their canvas. They are clipped
    /// when composited.
    fn check_layouts(&self, job: &JobConfig) {
        for canvas in &self.canvases {
            let (w, h) = canvas.image.dimensions();
            for unit in job.units_for(&canvas.id) {
                let layout = unit.layout.to_pixels();
                if !layout.fits_within(w, h) {
                    warn!(
                        unit = %unit.label(),
                        canvas = %canvas.id,
                        layout = ?layout,
                        canvas_w = w,
                        canvas_h = h,
                        "Layout does not fit inside canvas"
                    );
                }
            }
        }
    }

    /// Write every canvas to `output_dir`. Each canvas is attempted even if
    /// an earlier one fails.
    pub fn save_all(&self, output_dir: &Path) -> Vec<(String, PanelResult<PathBuf>)> {
        self.canvases
            .iter()
            .map(|canvas| {
                let path = output_dir.join(&canvas.output);
                let result = save_png(&canvas.image, &path).map(|()| {
                    info!(canvas = %canvas.id, path = %path.display(), "Saved canvas");
                    path
                });
                (canvas.id.clone(), result)
            })
            .collect()
    }
}
