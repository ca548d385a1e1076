//! Canvas-space rectangles.
//!
//! Layout, keep-region and mask rectangles are configured with fractional
//! pixel coordinates (they are measured off the background artwork) and
//! rounded to whole pixels at the point of use.

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};

/// A rectangle in canvas pixel coordinates, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Round to integer pixel bounds.
    ///
    /// Halves round to the nearest even integer, so a configured `1664.5`
    /// becomes `1664`.
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            x: self.x.round_ties_even() as i64,
            y: self.y.round_ties_even() as i64,
            width: self.width.max(0.0).round_ties_even() as u32,
            height: self.height.max(0.0).round_ties_even() as u32,
        }
    }

    /// Reject rectangles that can never describe a pixel area.
    pub fn validate(&self, what: &str) -> PanelResult<()> {
        let fields = [self.x, self.y, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(PanelError::Config(format!(
                "{what}: coordinates must be finite, got {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(PanelError::Config(format!(
                "{what}: width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A rectangle rounded to whole pixels. The origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the whole rectangle lies inside a `width`×`height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width as i64 && self.bottom() <= height as i64
    }
}
