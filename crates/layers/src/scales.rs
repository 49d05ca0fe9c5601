//! Data-to-pixel mappings shared by the charts.

use foundation::color::Rgb;

/// Evenly spaced bands for discrete domains (bar charts).
///
/// `padding` is applied between bands and on both outer edges, and the
/// bands are centered in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<T> {
    domain: Vec<T>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<T: PartialEq> BandScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let span = range.1 - range.0;
        let step = span / (n + padding).max(1.0);
        let start = range.0 + (span - step * (n - padding)) * 0.5;
        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `value`.
    pub fn position(&self, value: &T) -> Option<f64> {
        let i = self.domain.iter().position(|d| d == value)?;
        Some(self.start + self.step * i as f64)
    }

    pub fn center(&self, value: &T) -> Option<f64> {
        self.position(value).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Widens the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let step = tick_step(d0, d1, count);
        if step > 0.0 {
            self.domain = ((d0 / step).floor() * step, (d1 / step).ceil() * step);
        }
        self
    }

    /// Roughly `count` round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = min_max(self.domain);
        let step = tick_step(lo, hi, count);
        if step <= 0.0 {
            return vec![lo];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Logarithmic positions for strictly positive data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    /// `None` unless both domain ends are positive and finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(domain.0) && valid(domain.1)).then_some(Self { domain, range })
    }

    pub fn apply(&self, v: f64) -> Option<f64> {
        if !(v.is_finite() && v > 0.0) {
            return None;
        }
        let (d0, d1) = (self.domain.0.ln(), self.domain.1.ln());
        let (r0, r1) = self.range;
        if d1 == d0 {
            return Some((r0 + r1) / 2.0);
        }
        Some(r0 + (v.ln() - d0) / (d1 - d0) * (r1 - r0))
    }

    /// Powers of ten inside the domain.
    pub fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = min_max(self.domain);
        let first = lo.log10().ceil() as i32;
        let last = hi.log10().floor() as i32;
        (first..=last).map(|e| 10f64.powi(e)).collect()
    }
}

/// Continuous value to color along a ramp of evenly spaced stops.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    domain: (f64, f64),
    ramp: Vec<Rgb>,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64), ramp: &[Rgb]) -> Self {
        Self {
            domain,
            ramp: ramp.to_vec(),
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn color(&self, v: f64) -> Rgb {
        let Some(&first) = self.ramp.first() else {
            return Rgb::new(0, 0, 0);
        };
        if self.ramp.len() == 1 {
            return first;
        }
        let (d0, d1) = self.domain;
        let t = if d1 == d0 { 0.5 } else { ((v - d0) / (d1 - d0)).clamp(0.0, 1.0) };
        let scaled = t * (self.ramp.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(self.ramp.len() - 2);
        self.ramp[i].lerp(self.ramp[i + 1], scaled - i as f64)
    }
}

fn min_max((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// 1, 2 or 5 times a power of ten, so that about `count` steps cover the span.
fn tick_step(a: f64, b: f64, count: usize) -> f64 {
    let span = (b - a).abs();
    if count == 0 || span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let err = raw / power;
    let factor = if err >= 50f64.sqrt() {
        10.0
    } else if err >= 10f64.sqrt() {
        5.0
    } else if err >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}
