use std::cell::RefCell;
use std::rc::Rc;

use formats::DataBundle;
use foundation::ids::ListenerId;
use foundation::viewport::Viewport;
use runtime::EventBus;
use tracing::{debug, error};

use crate::config::StoryConfig;
use crate::renderer::{
    PointerEvent, PointerKind, PointerOutcome, RenderContext, RenderError, SceneRenderer,
};
use crate::state::{MountPhase, SceneState};
use crate::target::SharedTarget;

pub type SharedBus = Rc<RefCell<EventBus>>;

/// One mounted scene: its renderer, its private state and the handles it
/// draws through. Lives exactly as long as the mount.
pub struct SceneSession {
    index: usize,
    renderer: Rc<dyn SceneRenderer>,
    state: SceneState,
    bundle: Rc<DataBundle>,
    config: Rc<StoryConfig>,
    target: SharedTarget,
    bus: SharedBus,
}

impl SceneSession {
    pub fn new(
        index: usize,
        renderer: Rc<dyn SceneRenderer>,
        bundle: Rc<DataBundle>,
        config: Rc<StoryConfig>,
        target: SharedTarget,
        bus: SharedBus,
    ) -> Self {
        Self {
            index,
            renderer,
            state: SceneState::new(),
            bundle,
            config,
            target,
            bus,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn attach_listener(&mut self, id: ListenerId) {
        self.state.listener = Some(id);
    }

    /// First render with entrance animation.
    pub fn mount(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.state.phase = MountPhase::Mounting;
        self.emit("mounting", format!("{} at {}px", self.renderer.id(), viewport.width_px));
        {
            let mut target = self.target.borrow_mut();
            target.clear();
            target.set_caption(Some(self.renderer.caption()));
        }
        self.draw(viewport)?;
        self.state.phase = MountPhase::Mounted;
        self.emit("mounted", self.renderer.id());
        Ok(())
    }

    /// Debounced resize: recompute geometry only, no animation.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.state.is_mounted() {
            return;
        }
        self.emit("resize", format!("{}x{}", viewport.width_px, viewport.height_px));
        if let Err(err) = self.draw(viewport) {
            error!(scene = self.index, error = %err, "redraw after resize failed");
        }
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> Result<PointerOutcome, RenderError> {
        if !self.state.is_mounted() {
            return Ok(PointerOutcome::Ignored);
        }
        let viewport = self.current_viewport();
        let ctx = RenderContext::new(&self.bundle, &self.config, viewport, self.state.has_rendered);
        let outcome = self.renderer.pointer(&ctx, &mut self.state, event);
        match outcome {
            PointerOutcome::Ignored => {}
            PointerOutcome::TooltipChanged => self.push_tooltip(),
            PointerOutcome::Redraw => {
                self.emit("redraw", event.key.clone());
                self.draw(viewport)?;
                if event.kind == PointerKind::Click {
                    self.push_caption();
                }
                self.push_tooltip();
            }
        }
        Ok(outcome)
    }

    pub fn unmount(&mut self) {
        self.renderer.teardown(&mut self.state);
        self.state.hide_tooltip();
        {
            let mut target = self.target.borrow_mut();
            target.set_tooltip(None);
            target.unmount(self.index);
            target.clear();
            target.set_caption(None);
        }
        self.state.phase = MountPhase::Unmounted;
        self.state.listener = None;
        self.emit("unmounted", self.renderer.id());
    }

    fn current_viewport(&self) -> Viewport {
        self.state.viewport.unwrap_or(Viewport::new(0.0, 0.0))
    }

    fn draw(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        let ctx = RenderContext::new(&self.bundle, &self.config, viewport, self.state.has_rendered);
        let drawing = self.renderer.render(&ctx, &mut self.state)?;
        debug!(
            scene = self.index,
            policy = ?ctx.policy,
            layout = ?ctx.layout,
            marks = drawing.marks.len(),
            "scene rendered"
        );
        self.target.borrow_mut().mount(self.index, &drawing);
        self.emit("render", format!("{:?}", ctx.policy).to_lowercase());
        Ok(())
    }

    /// Interaction text wins over the scene's own caption.
    fn push_caption(&self) {
        let caption = self
            .state
            .annotation
            .as_deref()
            .unwrap_or(self.renderer.caption());
        self.target.borrow_mut().set_caption(Some(caption));
    }

    fn push_tooltip(&self) {
        self.target.borrow_mut().set_tooltip(self.state.tooltip.as_ref());
    }

    fn emit(&self, kind: &'static str, message: impl Into<String>) {
        self.bus.borrow_mut().emit(kind, Some(self.index), message);
    }
}

impl std::fmt::Debug for SceneSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSession")
            .field("index", &self.index)
            .field("scene", &self.renderer.id())
            .field("state", &self.state)
            .finish()
    }
}
