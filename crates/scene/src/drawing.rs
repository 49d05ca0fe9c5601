use foundation::color::Rgb;
use foundation::math::Vec2;
use foundation::viewport::Viewport;
use serde::Serialize;

use crate::layout::LayoutMode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Annular sector; angles in radians, clockwise from 12 o'clock.
    Slice {
        center: Vec2,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Polyline {
        points: Vec<Vec2>,
    },
    Circle {
        center: Vec2,
        radius: f64,
    },
    /// Filled area; the first ring of each polygon is its outer ring.
    Area {
        polygons: Vec<Vec<Vec<Vec2>>>,
    },
    Rule {
        from: Vec2,
        to: Vec2,
    },
    Label {
        at: Vec2,
        text: String,
        anchor: Anchor,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub dashed: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            dashed: false,
        }
    }
}

impl Style {
    pub fn filled(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroked(color: Rgb, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: Rgb, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

/// Entrance animation: the mark starts as `from` and reaches its final shape
/// after `delay_ms + duration_ms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub from: Option<Shape>,
}

impl Transition {
    pub fn new(delay_ms: f64, duration_ms: f64) -> Self {
        Self {
            delay_ms,
            duration_ms,
            from: None,
        }
    }

    pub fn from_shape(mut self, shape: Shape) -> Self {
        self.from = Some(shape);
        self
    }

    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }
}

/// One keyed visual element. Keys are stable across redraws of a scene so a
/// host can diff drawings and route pointer events back to the datum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub key: String,
    pub shape: Shape,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enter: Option<Transition>,
    pub interactive: bool,
}

impl Mark {
    pub fn new(key: impl Into<String>, shape: Shape, style: Style) -> Self {
        Self {
            key: key.into(),
            shape,
            style,
            enter: None,
            interactive: false,
        }
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn entering(mut self, transition: Transition) -> Self {
        self.enter = Some(transition);
        self
    }

    pub fn label(key: impl Into<String>, at: Vec2, text: impl Into<String>, anchor: Anchor) -> Self {
        Self::new(
            key,
            Shape::Label {
                at,
                text: text.into(),
                anchor,
            },
            Style::filled(Rgb::new(0x33, 0x33, 0x33)),
        )
    }
}

/// What a scene puts on screen for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawing {
    pub scene: String,
    pub viewport: Viewport,
    pub layout: LayoutMode,
    pub marks: Vec<Mark>,
}

impl Drawing {
    pub fn new(scene: impl Into<String>, viewport: Viewport, layout: LayoutMode) -> Self {
        Self {
            scene: scene.into(),
            viewport,
            layout,
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn mark(&self, key: &str) -> Option<&Mark> {
        self.marks.iter().find(|m| m.key == key)
    }

    /// Marks whose key starts with `prefix`, in drawing order.
    pub fn marks_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Mark> + 'a {
        self.marks.iter().filter(move |m| m.key.starts_with(prefix))
    }

    pub fn is_animated(&self) -> bool {
        self.marks.iter().any(|m| m.enter.is_some())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
