//! Common types shared by the compositor and the panel builder service.

pub mod error;
pub mod model;
pub mod rect;
pub mod time;

pub use error::{PanelError, PanelResult};
pub use model::{fill_template, ForecastModel, StepRule, DEFAULT_BASE_URL};
pub use rect::{PixelRect, Rect};
pub use time::IssuanceTime;
