/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

impl Trend {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The two points drawn as the trendline.
    pub fn endpoints(&self, first_x: f64, last_x: f64) -> [(f64, f64); 2] {
        [(first_x, self.at(first_x)), (last_x, self.at(last_x))]
    }
}

/// Closed-form ordinary least squares.
///
/// `None` for fewer than two points or when every x is the same.
pub fn linear_trend(points: &[(f64, f64)]) -> Option<Trend> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some(Trend {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
