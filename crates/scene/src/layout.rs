use foundation::viewport::Viewport;
use serde::Serialize;

/// Responsive breakpoint class. Secondary sub-charts are hidden when narrow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Wide,
    Narrow,
}

impl LayoutMode {
    pub fn for_viewport(viewport: Viewport, breakpoint_px: f64) -> Self {
        if viewport.width_px >= breakpoint_px {
            LayoutMode::Wide
        } else {
            LayoutMode::Narrow
        }
    }

    pub fn shows_secondary(self) -> bool {
        self == LayoutMode::Wide
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutMode;
    use foundation::viewport::Viewport;

    #[test]
    fn breakpoint_is_inclusive() {
        assert_eq!(LayoutMode::for_viewport(Viewport::new(768.0, 500.0), 768.0), LayoutMode::Wide);
        assert_eq!(LayoutMode::for_viewport(Viewport::new(767.0, 500.0), 768.0), LayoutMode::Narrow);
        assert!(!LayoutMode::Narrow.shows_secondary());
    }
}
