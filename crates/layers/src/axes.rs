use foundation::math::Vec2;
use foundation::viewport::PlotArea;
use scene::{Anchor, Mark, Shape, Style};

use crate::symbology::AXIS;

const TICK_LEN: f64 = 6.0;
const LABEL_GAP: f64 = 3.0;

/// Baseline along the bottom of `area`, with a tick and label per entry.
/// Ticks are `(x in px, label)`.
pub fn bottom_axis(prefix: &str, area: PlotArea, ticks: &[(f64, String)]) -> Vec<Mark> {
    let y = area.bottom();
    let mut marks = vec![rule(
        format!("{prefix}:domain"),
        Vec2::new(area.x, y),
        Vec2::new(area.right(), y),
    )];
    for (x, label) in ticks {
        marks.push(rule(
            format!("{prefix}:tick:{label}"),
            Vec2::new(*x, y),
            Vec2::new(*x, y + TICK_LEN),
        ));
        marks.push(Mark::label(
            format!("{prefix}:label:{label}"),
            Vec2::new(*x, y + TICK_LEN + LABEL_GAP),
            label.clone(),
            Anchor::Middle,
        ));
    }
    marks
}

/// Baseline along the left of `area`; ticks are `(y in px, label)`.
pub fn left_axis(prefix: &str, area: PlotArea, ticks: &[(f64, String)]) -> Vec<Mark> {
    let x = area.x;
    let mut marks = vec![rule(
        format!("{prefix}:domain"),
        Vec2::new(x, area.y),
        Vec2::new(x, area.bottom()),
    )];
    for (y, label) in ticks {
        marks.push(rule(
            format!("{prefix}:tick:{label}"),
            Vec2::new(x - TICK_LEN, *y),
            Vec2::new(x, *y),
        ));
        marks.push(Mark::label(
            format!("{prefix}:label:{label}"),
            Vec2::new(x - TICK_LEN - LABEL_GAP, *y),
            label.clone(),
            Anchor::End,
        ));
    }
    marks
}

/// Centered placeholder for a plot with nothing to show.
pub fn no_data(key: &str, area: PlotArea) -> Mark {
    Mark::label(
        key,
        Vec2::new(area.x + area.width / 2.0, area.y + area.height / 2.0),
        "No data",
        Anchor::Middle,
    )
}

fn rule(key: String, from: Vec2, to: Vec2) -> Mark {
    Mark::new(key, Shape::Rule { from, to }, Style::stroked(AXIS, 1.0))
}

/// `12000` -> `"12k"`, `1500000` -> `"1.5M"`.
pub fn short_number(v: f64) -> String {
    let abs = v.abs();
    let (scaled, suffix) = if abs >= 1e6 {
        (v / 1e6, "M")
    } else if abs >= 1e3 {
        (v / 1e3, "k")
    } else {
        (v, "")
    };
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::{bottom_axis, short_number};
    use foundation::viewport::PlotArea;

    #[test]
    fn bottom_axis_has_domain_ticks_and_labels() {
        let area = PlotArea {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        };
        let marks = bottom_axis("x", area, &[(10.0, "2000".into()), (90.0, "2005".into())]);
        assert_eq!(marks.len(), 5);
        assert_eq!(marks[0].key, "x:domain");
        assert!(marks.iter().any(|m| m.key == "x:label:2005"));
    }

    #[test]
    fn short_numbers() {
        assert_eq!(short_number(950.0), "950");
        assert_eq!(short_number(12000.0), "12k");
        assert_eq!(short_number(1_500_000.0), "1.5M");
        assert_eq!(short_number(450_000.0), "450k");
    }
}
