use foundation::ids::ListenerId;
use foundation::viewport::Viewport;

use crate::layout::LayoutMode;
use crate::selection::CategorySet;
use crate::tooltip::Tooltip;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MountPhase {
    #[default]
    Unmounted,
    Mounting,
    Mounted,
}

/// Mutable state of one mounted scene.
///
/// Created when the scene mounts and dropped when it unmounts, so selections
/// never leak into the next visit.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub phase: MountPhase,
    pub has_rendered: bool,
    pub render_count: u32,
    pub selected_period: Option<i32>,
    /// Narrative text replacing the scene caption after an interaction.
    pub annotation: Option<String>,
    /// How many times the scene's aggregates were prepared during this mount.
    pub aggregations: u32,
    pub visible: CategorySet,
    pub hovered: Option<String>,
    pub tooltip: Option<Tooltip>,
    pub viewport: Option<Viewport>,
    pub layout: LayoutMode,
    pub listener: Option<ListenerId>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == MountPhase::Mounted
    }

    pub fn hide_tooltip(&mut self) -> bool {
        self.hovered = None;
        self.tooltip.take().is_some()
    }
}
