//! Forecast panel builder.
//!
//! Fetches rain charts published by several NWP models, clears their white
//! backgrounds and composites them onto fixed background panels, one PNG per
//! panel. What goes where is described by job files in `config/jobs/`.

pub mod config;
pub mod fetch;
pub mod router;
pub mod run;

pub use config::{load_job_configs, CanvasConfig, FetchSettings, JobConfig, OverlaySource, UnitConfig};
pub use fetch::{fetch_chart_image, fetch_issuance, ChartSource, HttpChartSource};
pub use router::{Canvas, CanvasSet};
pub use run::{JobRunner, RunReport, UnitOutcome};
