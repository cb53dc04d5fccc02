use serde::{Deserialize, Serialize};

/// Drawable page area in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Page size given in inches, rounded to whole points.
    #[must_use]
    pub fn from_inches(width: f64, height: f64) -> Self {
        Self {
            width: (width * POINTS_PER_INCH).round() as u32,
            height: (height * POINTS_PER_INCH).round() as u32,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

pub const POINTS_PER_INCH: f64 = 72.0;
