use foundation::color::Rgb;

pub const BAR: Rgb = Rgb::new(0x55, 0x55, 0x55);
pub const BAR_SELECTED: Rgb = Rgb::new(0xf5, 0x7c, 0x00);
pub const TRENDLINE: Rgb = Rgb::new(0x21, 0x96, 0xf3);
pub const OTHER_SLICE: Rgb = Rgb::new(0x99, 0x99, 0x99);
pub const SLICE_STROKE: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const AVERAGE_LINE: Rgb = Rgb::new(0x00, 0x00, 0x00);
pub const CALLOUT: Rgb = Rgb::new(0x80, 0x80, 0x80);
pub const MEAN_RULE: Rgb = Rgb::new(0x99, 0x99, 0x99);
pub const AXIS: Rgb = Rgb::new(0x33, 0x33, 0x33);
pub const NO_DATA: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);
pub const REGION_STROKE: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const REGION_HOVER_STROKE: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// Orange-red sequential ramp, light to dark.
pub const OR_RD: [Rgb; 9] = [
    Rgb::new(0xff, 0xf7, 0xec),
    Rgb::new(0xfe, 0xe8, 0xc8),
    Rgb::new(0xfd, 0xd4, 0x9e),
    Rgb::new(0xfd, 0xbb, 0x84),
    Rgb::new(0xfc, 0x8d, 0x59),
    Rgb::new(0xef, 0x65, 0x48),
    Rgb::new(0xd7, 0x30, 0x1f),
    Rgb::new(0xb3, 0x00, 0x00),
    Rgb::new(0x7f, 0x00, 0x00),
];

/// Hover emphasis: bars brighten, slices darken.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Emphasis {
    Brighter,
    Darker,
}

pub fn emphasize(color: Rgb, hovered: bool, emphasis: Emphasis, k: f64) -> Rgb {
    match (hovered, emphasis) {
        (false, _) => color,
        (true, Emphasis::Brighter) => color.brighter(k),
        (true, Emphasis::Darker) => color.darker(k),
    }
}

#[cfg(test)]
mod tests {
    use super::{BAR, Emphasis, emphasize};

    #[test]
    fn only_hovered_marks_change() {
        assert_eq!(emphasize(BAR, false, Emphasis::Brighter, 1.0), BAR);
        let lit = emphasize(BAR, true, Emphasis::Brighter, 1.0);
        assert!(lit.r > BAR.r);
        let dim = emphasize(BAR, true, Emphasis::Darker, 0.7);
        assert!(dim.r < BAR.r);
    }
}
