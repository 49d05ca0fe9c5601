use serde::Serialize;

use crate::drawing::Drawing;

/// How marks reach their final geometry.
///
/// The first render of a mounted scene plays the chart's staggered entrance;
/// every later render of the same mount (resize, selection change) snaps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPolicy {
    Entrance,
    Snap,
}

impl AnimationPolicy {
    pub fn for_render(has_rendered: bool) -> Self {
        if has_rendered {
            AnimationPolicy::Snap
        } else {
            AnimationPolicy::Entrance
        }
    }

    pub fn apply(self, drawing: &mut Drawing) {
        if self == AnimationPolicy::Snap {
            for mark in &mut drawing.marks {
                mark.enter = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationPolicy;
    use crate::drawing::{Drawing, Mark, Shape, Style, Transition};
    use crate::layout::LayoutMode;
    use foundation::math::Vec2;
    use foundation::viewport::Viewport;

    fn animated() -> Drawing {
        let mut d = Drawing::new("s", Viewport::new(900.0, 400.0), LayoutMode::Wide);
        for i in 0..3 {
            d.push(
                Mark::new(
                    format!("dot:{i}"),
                    Shape::Circle {
                        center: Vec2::new(i as f64, 0.0),
                        radius: 4.0,
                    },
                    Style::default(),
                )
                .entering(Transition::new(i as f64 * 100.0, 800.0)),
            );
        }
        d
    }

    #[test]
    fn first_render_keeps_entrance_transitions() {
        let mut d = animated();
        let policy = AnimationPolicy::for_render(false);
        assert_eq!(policy, AnimationPolicy::Entrance);
        policy.apply(&mut d);
        let delays: Vec<f64> = d.marks.iter().filter_map(|m| m.enter.as_ref()).map(|t| t.delay_ms).collect();
        assert_eq!(delays, vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn rerender_snaps() {
        let mut d = animated();
        AnimationPolicy::for_render(true).apply(&mut d);
        assert!(!d.is_animated());
    }
}
