use std::cell::RefCell;
use std::fmt;

use formats::DataBundle;

use crate::config::StoryConfig;
use crate::drawing::Drawing;
use crate::renderer::{PointerEvent, PointerKind, PointerOutcome, RenderContext, RenderError, SceneRenderer};
use crate::state::SceneState;
use crate::tooltip::Tooltip;

/// Chart-specific half of a scene: geometry, tooltip content, click
/// semantics. [`ChartScene`] supplies the lifecycle around it.
pub trait Chart {
    /// Aggregates derived from the bundle. Prepared on mount and after a
    /// selection change, then reused by every resize redraw.
    type Data;

    fn id(&self) -> &'static str;

    fn caption(&self) -> &str;

    /// Seeds selections of a fresh mount.
    fn init(&self, _bundle: &DataBundle, _state: &mut SceneState) {}

    /// Reads the bundle. Must not depend on the viewport.
    fn prepare(&self, bundle: &DataBundle, config: &StoryConfig, state: &SceneState) -> Self::Data;

    /// Marks for the current state and viewport. Entrance transitions are
    /// always attached; the animation policy strips them on re-render.
    fn draw(
        &self,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &Self::Data,
    ) -> Result<Drawing, RenderError>;

    /// Tooltip for the datum behind `key`.
    fn describe(
        &self,
        ctx: &RenderContext<'_>,
        state: &SceneState,
        data: &Self::Data,
        key: &str,
    ) -> Option<Tooltip>;

    /// Click on `key`. Returns `true` when the state changed.
    fn select(
        &self,
        _ctx: &RenderContext<'_>,
        _state: &mut SceneState,
        _data: &Self::Data,
        _key: &str,
    ) -> bool {
        false
    }
}

/// Shared lifecycle for every chart scene: animation policy, tooltip
/// tracking, hover and selection redraws, and the prepared aggregates of the
/// current mount.
pub struct ChartScene<C: Chart> {
    chart: C,
    prepared: RefCell<Option<C::Data>>,
}

impl<C: Chart> ChartScene<C> {
    pub fn new(chart: C) -> Self {
        Self {
            chart,
            prepared: RefCell::new(None),
        }
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    fn invalidate(&self) {
        self.prepared.borrow_mut().take();
    }

    /// Runs `f` against the prepared aggregates, preparing them first when
    /// the cache is empty.
    fn with_data<R>(
        &self,
        ctx: &RenderContext<'_>,
        state: &mut SceneState,
        f: impl FnOnce(&C::Data, &mut SceneState) -> R,
    ) -> R {
        let mut slot = self.prepared.borrow_mut();
        let data = slot.get_or_insert_with(|| {
            state.aggregations += 1;
            self.chart.prepare(ctx.bundle, ctx.config, state)
        });
        f(data, state)
    }
}

impl<C: Chart> fmt::Debug for ChartScene<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartScene")
            .field("id", &self.chart.id())
            .field("prepared", &self.prepared.borrow().is_some())
            .finish()
    }
}

impl<C: Chart> SceneRenderer for ChartScene<C> {
    fn id(&self) -> &'static str {
        self.chart.id()
    }

    fn caption(&self) -> &str {
        self.chart.caption()
    }

    fn render(&self, ctx: &RenderContext<'_>, state: &mut SceneState) -> Result<Drawing, RenderError> {
        if !state.has_rendered {
            self.invalidate();
            self.chart.init(ctx.bundle, state);
        }
        let mut drawing = self.with_data(ctx, state, |data, state| self.chart.draw(ctx, state, data))?;
        ctx.policy.apply(&mut drawing);

        state.has_rendered = true;
        state.render_count += 1;
        state.viewport = Some(ctx.viewport);
        state.layout = ctx.layout;
        Ok(drawing)
    }

    fn pointer(
        &self,
        ctx: &RenderContext<'_>,
        state: &mut SceneState,
        event: &PointerEvent,
    ) -> PointerOutcome {
        match event.kind {
            PointerKind::Enter => {
                let described =
                    self.with_data(ctx, state, |data, state| self.chart.describe(ctx, state, data, &event.key));
                let Some(mut tooltip) = described else {
                    return PointerOutcome::Ignored;
                };
                tooltip.follow(event.position);
                state.hovered = Some(event.key.clone());
                state.tooltip = Some(tooltip);
                PointerOutcome::Redraw
            }
            PointerKind::Move => match state.tooltip.as_mut() {
                Some(tooltip) if tooltip.key == event.key => {
                    tooltip.follow(event.position);
                    PointerOutcome::TooltipChanged
                }
                _ => PointerOutcome::Ignored,
            },
            PointerKind::Leave => {
                if state.hovered.as_deref() == Some(event.key.as_str()) && state.hide_tooltip() {
                    PointerOutcome::Redraw
                } else {
                    PointerOutcome::Ignored
                }
            }
            PointerKind::Click => {
                let changed =
                    self.with_data(ctx, state, |data, state| self.chart.select(ctx, state, data, &event.key));
                if !changed {
                    return PointerOutcome::Ignored;
                }
                self.invalidate();
                // The hovered datum may have changed meaning (e.g. a share of
                // a new selection), so refresh its tooltip.
                if let Some(key) = state.hovered.clone() {
                    let position = state.tooltip.as_ref().map(|t| t.position);
                    let refreshed =
                        self.with_data(ctx, state, |data, state| self.chart.describe(ctx, state, data, &key));
                    state.tooltip = refreshed.map(|mut t| {
                        if let Some(p) = position {
                            t.position = p;
                        }
                        t
                    });
                }
                PointerOutcome::Redraw
            }
        }
    }

    fn teardown(&self, state: &mut SceneState) {
        self.invalidate();
        state.hide_tooltip();
        state.visible.clear();
        state.selected_period = None;
        state.annotation = None;
    }
}
