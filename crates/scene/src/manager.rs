use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use formats::DataBundle;
use foundation::time::Time;
use foundation::viewport::Viewport;
use runtime::{Event, EventBus, ResizeHub, ResizeListener};
use tracing::{debug, error, info, warn};

use crate::config::StoryConfig;
use crate::navigation::NavState;
use crate::registry::SceneRegistry;
use crate::renderer::{PointerEvent, PointerOutcome, RenderError, SceneRenderer};
use crate::session::{SceneSession, SharedBus};
use crate::state::SceneState;
use crate::target::SharedTarget;

#[derive(Debug)]
pub enum SceneError {
    /// Navigation before data arrived; the request is kept and served by
    /// [`SceneManager::attach_bundle`].
    NotLoaded,
    UnknownScene { index: usize, count: usize },
    Render { index: usize, source: RenderError },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NotLoaded => write!(f, "story data is not loaded yet"),
            SceneError::UnknownScene { index, count } => {
                write!(f, "unknown scene {index} (story has {count} scenes)")
            }
            SceneError::Render { index, source } => write!(f, "scene {index} failed to render: {source}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Render { source, .. } => Some(source),
            _ => None,
        }
    }
}

struct ActiveScene {
    index: usize,
    session: Rc<RefCell<SceneSession>>,
    listener: ResizeListener,
}

/// Owns navigation: which scene is mounted, its state and its resize
/// subscription.
///
/// At most one scene is mounted. Loading a scene always tears the previous
/// one down first (listener detached, state dropped, target cleared). If the
/// new scene fails its first render, the previous one is mounted again.
pub struct SceneManager {
    registry: SceneRegistry,
    config: Rc<StoryConfig>,
    target: SharedTarget,
    hub: ResizeHub,
    bus: SharedBus,
    bundle: Option<Rc<DataBundle>>,
    initial_viewport: Viewport,
    active: Option<ActiveScene>,
    requested: Option<usize>,
}

impl SceneManager {
    pub fn new(
        registry: SceneRegistry,
        config: StoryConfig,
        target: SharedTarget,
        viewport: Viewport,
    ) -> Self {
        Self {
            registry,
            config: Rc::new(config),
            target,
            hub: ResizeHub::new(),
            bus: Rc::new(RefCell::new(EventBus::new())),
            bundle: None,
            initial_viewport: viewport,
            active: None,
            requested: None,
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn hub(&self) -> &ResizeHub {
        &self.hub
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.is_some()
    }

    /// Hands over the loaded data. A navigation request made before this
    /// point is served now.
    pub fn attach_bundle(&mut self, bundle: Rc<DataBundle>) -> Result<(), SceneError> {
        self.bundle = Some(bundle);
        self.emit("loaded", None, "data bundle attached");
        match self.requested.take() {
            Some(index) => {
                debug!(index, "mounting deferred scene");
                self.load_scene(index)
            }
            None => Ok(()),
        }
    }

    pub fn load_scene(&mut self, index: usize) -> Result<(), SceneError> {
        let count = self.registry.len();
        let Some(renderer) = self.registry.get(index) else {
            warn!(index, count, "unknown scene requested");
            self.emit("unknown_scene", Some(index), format!("{count} scenes"));
            return Err(SceneError::UnknownScene { index, count });
        };
        let Some(bundle) = self.bundle.clone() else {
            debug!(index, "scene requested before data load");
            self.requested = Some(index);
            self.emit("deferred", Some(index), renderer.id());
            return Err(SceneError::NotLoaded);
        };

        let previous = self.current();
        self.teardown_active();

        let viewport = self.hub.latest_viewport().unwrap_or(self.initial_viewport);
        match self.mount(index, renderer.clone(), bundle.clone(), viewport) {
            Ok(active) => {
                self.active = Some(active);
                let nav = self.nav_state();
                info!(index, scene = renderer.id(), nav = %nav.label(), "scene mounted");
                self.emit("navigation", Some(index), nav.label());
                Ok(())
            }
            Err(source) => {
                error!(index, scene = renderer.id(), error = %source, "scene failed to render");
                self.emit("render_failed", Some(index), source.to_string());
                if let Some(previous) = previous.filter(|p| *p != index) {
                    self.restore(previous, bundle, viewport);
                }
                Err(SceneError::Render { index, source })
            }
        }
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), SceneError> {
        self.load_scene(index)
    }

    /// Moves forward one scene. `Ok(false)` at the last scene.
    pub fn next(&mut self) -> Result<bool, SceneError> {
        let target = self.position().map_or(0, |i| i + 1);
        if target >= self.registry.len() {
            debug!("already at the last scene");
            self.emit("nav_noop", self.position(), "next");
            return Ok(false);
        }
        self.load_scene(target).map(|()| true)
    }

    /// Moves back one scene. `Ok(false)` at the first scene.
    pub fn previous(&mut self) -> Result<bool, SceneError> {
        let Some(target) = self.position().and_then(|i| i.checked_sub(1)) else {
            debug!("already at the first scene");
            self.emit("nav_noop", self.position(), "previous");
            return Ok(false);
        };
        self.load_scene(target).map(|()| true)
    }

    pub fn current(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn nav_state(&self) -> NavState {
        NavState::new(self.current(), self.registry.len())
    }

    pub fn state(&self) -> Option<Ref<'_, SceneState>> {
        self.active
            .as_ref()
            .map(|a| Ref::map(a.session.borrow(), SceneSession::state))
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> Result<PointerOutcome, SceneError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(PointerOutcome::Ignored);
        };
        let index = active.index;
        let outcome = active.session.borrow_mut().pointer(event);
        outcome.map_err(|source| SceneError::Render { index, source })
    }

    /// Feeds a raw viewport change; the redraw happens on a later `advance`.
    pub fn notify_resize(&self, now: Time, viewport: Viewport) {
        self.hub.notify(now, viewport);
    }

    pub fn advance(&self, now: Time) -> usize {
        self.hub.advance(now)
    }

    pub fn events(&self) -> Vec<Event> {
        self.bus.borrow().events().to_vec()
    }

    pub fn event_kinds(&self) -> Vec<&'static str> {
        self.bus.borrow().kinds()
    }

    /// Unmounts the current scene, if any.
    pub fn teardown(&mut self) {
        self.teardown_active();
    }

    fn position(&self) -> Option<usize> {
        self.current().or(self.requested)
    }

    /// Builds a session for `index`, renders it and subscribes it to resizes.
    /// Nothing stays attached when the first render fails.
    fn mount(
        &self,
        index: usize,
        renderer: Rc<dyn SceneRenderer>,
        bundle: Rc<DataBundle>,
        viewport: Viewport,
    ) -> Result<ActiveScene, RenderError> {
        let session = Rc::new(RefCell::new(SceneSession::new(
            index,
            renderer,
            bundle,
            self.config.clone(),
            self.target.clone(),
            self.bus.clone(),
        )));
        let mounted = session.borrow_mut().mount(viewport);
        if let Err(source) = mounted {
            session.borrow_mut().unmount();
            return Err(source);
        }

        let weak = Rc::downgrade(&session);
        let listener = self
            .hub
            .on_resize(self.config.debounce_window(), move |viewport| {
                if let Some(session) = weak.upgrade() {
                    session.borrow_mut().resize(viewport);
                }
            });
        session.borrow_mut().attach_listener(listener.id());
        Ok(ActiveScene {
            index,
            session,
            listener,
        })
    }

    /// Remounts the scene that was showing before a failed navigation, so the
    /// story and its navigation stay where they were.
    fn restore(&mut self, index: usize, bundle: Rc<DataBundle>, viewport: Viewport) {
        let Some(renderer) = self.registry.get(index) else {
            return;
        };
        match self.mount(index, renderer, bundle, viewport) {
            Ok(active) => {
                warn!(index, "kept previous scene after render failure");
                self.active = Some(active);
                self.emit("restored", Some(index), self.nav_state().label());
            }
            Err(source) => error!(index, error = %source, "previous scene failed to remount"),
        }
    }

    fn teardown_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.listener.detach();
            active.session.borrow_mut().unmount();
        }
    }

    fn emit(&self, kind: &'static str, scene: Option<usize>, message: impl Into<String>) {
        self.bus.borrow_mut().emit(kind, scene, message);
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.teardown_active();
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("registry", &self.registry)
            .field("current", &self.current())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
