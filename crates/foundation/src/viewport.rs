use serde::{Deserialize, Serialize};

/// Pixel size of the drawing container.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px: width_px.max(0.0),
            height_px: height_px.max(0.0),
        }
    }

    /// Plot rectangle left after removing `margins`; never negative.
    pub fn inner(&self, margins: Margins) -> PlotArea {
        PlotArea {
            x: margins.left,
            y: margins.top,
            width: (self.width_px - margins.left - margins.right).max(0.0),
            height: (self.height_px - margins.top - margins.bottom).max(0.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Plot rectangle in container pixels (origin top-left).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Splits horizontally at `fraction` of the width.
    pub fn split_horizontal(&self, fraction: f64) -> (PlotArea, PlotArea) {
        let left_w = self.width * fraction.clamp(0.0, 1.0);
        (
            PlotArea {
                width: left_w,
                ..*self
            },
            PlotArea {
                x: self.x + left_w,
                width: self.width - left_w,
                ..*self
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Margins, Viewport};

    #[test]
    fn inner_area_subtracts_margins() {
        let vp = Viewport::new(900.0, 400.0);
        let area = vp.inner(Margins::new(60.0, 40.0, 80.0, 80.0));
        assert_eq!(area.x, 80.0);
        assert_eq!(area.y, 60.0);
        assert_eq!(area.width, 780.0);
        assert_eq!(area.height, 260.0);
        assert_eq!(area.bottom(), 320.0);
    }

    #[test]
    fn tiny_viewport_clamps_to_zero() {
        let area = Viewport::new(50.0, 10.0).inner(Margins::new(20.0, 40.0, 20.0, 40.0));
        assert_eq!(area.width, 0.0);
        assert_eq!(area.height, 0.0);
    }

    #[test]
    fn split_keeps_total_width() {
        let area = Viewport::new(1000.0, 500.0).inner(Margins::default());
        let (a, b) = area.split_horizontal(0.6);
        assert_eq!(a.width, 600.0);
        assert_eq!(b.x, 600.0);
        assert_eq!(a.width + b.width, 1000.0);
    }
}
