use std::fmt;

use formats::DataBundle;
use foundation::math::Vec2;
use foundation::viewport::Viewport;

use crate::animation::AnimationPolicy;
use crate::config::StoryConfig;
use crate::drawing::Drawing;
use crate::layout::LayoutMode;
use crate::state::SceneState;

/// Everything a renderer may read during one pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub bundle: &'a DataBundle,
    pub config: &'a StoryConfig,
    pub viewport: Viewport,
    pub layout: LayoutMode,
    pub policy: AnimationPolicy,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        bundle: &'a DataBundle,
        config: &'a StoryConfig,
        viewport: Viewport,
        has_rendered: bool,
    ) -> Self {
        Self {
            bundle,
            config,
            viewport,
            layout: LayoutMode::for_viewport(viewport, config.layout_breakpoint_px),
            policy: AnimationPolicy::for_render(has_rendered),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Move,
    Leave,
    Click,
}

/// Pointer interaction routed by the host to the mark it hit.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub key: String,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, key: impl Into<String>, position: Vec2) -> Self {
        Self {
            kind,
            key: key.into(),
            position,
        }
    }

    pub fn enter(key: impl Into<String>, position: Vec2) -> Self {
        Self::new(PointerKind::Enter, key, position)
    }

    pub fn moved(key: impl Into<String>, position: Vec2) -> Self {
        Self::new(PointerKind::Move, key, position)
    }

    pub fn leave(key: impl Into<String>) -> Self {
        Self::new(PointerKind::Leave, key, Vec2::default())
    }

    pub fn click(key: impl Into<String>) -> Self {
        Self::new(PointerKind::Click, key, Vec2::default())
    }
}

/// What the session must do after a pointer event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    TooltipChanged,
    Redraw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    EmptyData { scene: &'static str, what: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyData { scene, what } => write!(f, "scene {scene}: no {what} to draw"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Capability every scene in the registry provides.
pub trait SceneRenderer {
    /// Stable identifier, e.g. `"immigration"`.
    fn id(&self) -> &'static str;

    fn caption(&self) -> &str;

    /// Produces the full drawing for the current state. Called on mount and
    /// again on every resize or selection redraw.
    fn render(&self, ctx: &RenderContext<'_>, state: &mut SceneState) -> Result<Drawing, RenderError>;

    fn pointer(
        &self,
        ctx: &RenderContext<'_>,
        state: &mut SceneState,
        event: &PointerEvent,
    ) -> PointerOutcome;

    fn teardown(&self, _state: &mut SceneState) {}
}
