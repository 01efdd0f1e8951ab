use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Cut along a vertical line: left half, then right half
    Vertical,
    /// Cut along a horizontal line: top half, then bottom half
    Horizontal,
}

impl SplitDirection {
    /// Names of the two halves, in output order
    pub fn half_names(self) -> (&'static str, &'static str) {
        match self {
            SplitDirection::Vertical => ("left", "right"),
            SplitDirection::Horizontal => ("top", "bottom"),
        }
    }
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitDirection::Vertical => write!(f, "vertical"),
            SplitDirection::Horizontal => write!(f, "horizontal"),
        }
    }
}

impl FromStr for SplitDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(SplitDirection::Vertical),
            "horizontal" | "h" => Ok(SplitDirection::Horizontal),
            other => Err(format!(
                "Unknown direction '{}' (expected vertical or horizontal)",
                other
            )),
        }
    }
}

/// Size of a page in PDF units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Returns `None` unless both sides are positive and finite.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(BoundingBox { width, height })
        } else {
            None
        }
    }
}

/// A crop region in the same coordinate space as the page's [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropRectangle {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl CropRectangle {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        CropRectangle { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Shift the rectangle, e.g. onto a media box whose origin is not (0, 0).
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        CropRectangle {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

/// Split a page box in two halves: (left, right) or (top, bottom).
///
/// The page origin is bottom-left, so the top half spans the upper y-range.
/// No rounding is applied to the midpoint.
pub fn split_box(bbox: BoundingBox, direction: SplitDirection) -> (CropRectangle, CropRectangle) {
    let BoundingBox { width, height } = bbox;
    match direction {
        SplitDirection::Vertical => {
            let mid = width / 2.0;
            (
                CropRectangle::new(0.0, 0.0, mid, height),
                CropRectangle::new(mid, 0.0, width, height),
            )
        }
        SplitDirection::Horizontal => {
            let mid = height / 2.0;
            (
                CropRectangle::new(0.0, mid, width, height),
                CropRectangle::new(0.0, 0.0, width, mid),
            )
        }
    }
}
