use foundation::math::Vec2;
use serde::Serialize;

/// Offset from the pointer so the tooltip does not sit under the cursor.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, -40.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Key of the mark the content was derived from.
    pub key: String,
    pub title: String,
    pub lines: Vec<String>,
    pub position: Vec2,
}

impl Tooltip {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            lines: Vec::new(),
            position: Vec2::default(),
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Places the tooltip next to `pointer`.
    pub fn follow(&mut self, pointer: Vec2) {
        self.position = pointer + TOOLTIP_OFFSET;
    }

    pub fn text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Thousands-separated integer rendering for counts in tooltips.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
