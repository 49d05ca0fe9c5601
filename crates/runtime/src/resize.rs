use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use foundation::ids::{IdAllocator, ListenerId};
use foundation::time::Time;
use foundation::viewport::Viewport;
use tracing::{debug, trace};

use crate::debounce::Debouncer;
use crate::metrics::ResizeMetrics;

pub type ResizeHandler = Box<dyn FnMut(Viewport)>;

struct ListenerSlot {
    debouncer: Debouncer,
    pending: Option<Viewport>,
    // Taken out while the handler runs so it may call back into the hub.
    handler: Option<ResizeHandler>,
}

#[derive(Default)]
struct HubInner {
    ids: IdAllocator,
    listeners: BTreeMap<ListenerId, ListenerSlot>,
    latest: Option<Viewport>,
    metrics: ResizeMetrics,
}

/// Viewport resize event source with per-listener debouncing.
///
/// The host feeds raw events with [`notify`](Self::notify) and drives time
/// with [`advance`](Self::advance). Each listener fires once per quiet burst,
/// with the most recent viewport of that burst.
///
/// Ordering contract:
/// - Due listeners fire in ascending `ListenerId` (attachment) order.
#[derive(Clone, Default)]
pub struct ResizeHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a debounced handler. The returned listener detaches on drop.
    pub fn on_resize(
        &self,
        window: Time,
        handler: impl FnMut(Viewport) + 'static,
    ) -> ResizeListener {
        let mut inner = self.inner.borrow_mut();
        let id = inner.ids.allocate();
        inner.listeners.insert(
            id,
            ListenerSlot {
                debouncer: Debouncer::new(window),
                pending: None,
                handler: Some(Box::new(handler)),
            },
        );
        inner.metrics.attached += 1;
        debug!(listener = id.get(), "resize listener attached");
        ResizeListener {
            id,
            hub: Rc::downgrade(&self.inner),
            attached: Cell::new(true),
        }
    }

    /// Records a raw resize event.
    pub fn notify(&self, now: Time, viewport: Viewport) {
        let mut inner = self.inner.borrow_mut();
        inner.latest = Some(viewport);
        inner.metrics.events += 1;
        for slot in inner.listeners.values_mut() {
            slot.pending = Some(viewport);
            slot.debouncer.trigger(now);
        }
        trace!(
            width = viewport.width_px,
            height = viewport.height_px,
            "resize event"
        );
    }

    /// Fires every listener whose burst has gone quiet. Returns how many fired.
    pub fn advance(&self, now: Time) -> usize {
        let due: Vec<(ListenerId, Viewport)> = {
            let mut inner = self.inner.borrow_mut();
            inner
                .listeners
                .iter_mut()
                .filter_map(|(id, slot)| {
                    if slot.debouncer.poll(now) {
                        slot.pending.take().map(|vp| (*id, vp))
                    } else {
                        None
                    }
                })
                .collect()
        };

        let mut fired = 0usize;
        for (id, viewport) in due {
            let handler = self
                .inner
                .borrow_mut()
                .listeners
                .get_mut(&id)
                .and_then(|slot| slot.handler.take());
            // Detached by an earlier handler in this same pass.
            let Some(mut handler) = handler else {
                continue;
            };

            handler(viewport);
            fired += 1;

            let orphan = {
                let mut inner = self.inner.borrow_mut();
                inner.metrics.redraws += 1;
                match inner.listeners.get_mut(&id) {
                    Some(slot) => {
                        slot.handler = Some(handler);
                        None
                    }
                    None => Some(handler),
                }
            };
            drop(orphan);
        }
        fired
    }

    /// Earliest pending deadline, for hosts that sleep until the next fire.
    pub fn next_deadline(&self) -> Option<Time> {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter_map(|slot| slot.debouncer.deadline())
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn latest_viewport(&self) -> Option<Viewport> {
        self.inner.borrow().latest
    }

    pub fn metrics(&self) -> ResizeMetrics {
        self.inner.borrow().metrics
    }
}

/// Handle to an attached resize handler.
///
/// `detach` is idempotent; dropping the handle detaches as well.
pub struct ResizeListener {
    id: ListenerId,
    hub: Weak<RefCell<HubInner>>,
    attached: Cell<bool>,
}

impl ResizeListener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Removes the handler from the hub.
    ///
    /// Returns `true` only for the call that actually detached it.
    pub fn detach(&self) -> bool {
        if !self.attached.replace(false) {
            return false;
        }
        let Some(inner) = self.hub.upgrade() else {
            return false;
        };
        let removed = {
            let mut inner = inner.borrow_mut();
            let removed = inner.listeners.remove(&self.id);
            if removed.is_some() {
                inner.metrics.detached += 1;
            }
            removed
        };
        debug!(listener = self.id.get(), "resize listener detached");
        // The slot owns the handler closure; drop it outside the borrow.
        removed.is_some()
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ResizeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeListener")
            .field("id", &self.id)
            .field("attached", &self.attached.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::ResizeHub;
    use foundation::time::Time;
    use foundation::viewport::Viewport;

    fn ms(n: u64) -> Time {
        Time::from_millis(n)
    }

    #[test]
    fn two_rapid_events_cause_one_recompute() {
        let hub = ResizeHub::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (c, s) = (Rc::clone(&calls), Rc::clone(&seen));
        let _listener = hub.on_resize(ms(50), move |vp| {
            c.set(c.get() + 1);
            s.borrow_mut().push(vp.width_px);
        });

        hub.notify(ms(0), Viewport::new(800.0, 400.0));
        hub.notify(ms(20), Viewport::new(640.0, 400.0));
        assert_eq!(hub.advance(ms(40)), 0);
        assert_eq!(hub.advance(ms(100)), 1);
        assert_eq!(hub.advance(ms(200)), 0);

        assert_eq!(calls.get(), 1);
        assert_eq!(*seen.borrow(), vec![640.0]);
        assert_eq!(hub.metrics().events, 2);
        assert_eq!(hub.metrics().redraws, 1);
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let hub = ResizeHub::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _listener = hub.on_resize(ms(50), move |_| c.set(c.get() + 1));

        hub.notify(ms(0), Viewport::new(800.0, 400.0));
        hub.advance(ms(100));
        hub.notify(ms(200), Viewport::new(500.0, 400.0));
        hub.advance(ms(300));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn detach_is_idempotent_and_stops_delivery() {
        let hub = ResizeHub::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let listener = hub.on_resize(ms(50), move |_| c.set(c.get() + 1));
        assert_eq!(hub.listener_count(), 1);

        assert!(listener.detach());
        assert!(!listener.detach());
        assert!(!listener.is_attached());
        assert_eq!(hub.listener_count(), 0);

        hub.notify(ms(0), Viewport::new(800.0, 400.0));
        assert_eq!(hub.advance(ms(100)), 0);
        assert_eq!(calls.get(), 0);
        assert_eq!(hub.metrics().live(), 0);
    }

    #[test]
    fn dropping_listener_detaches() {
        let hub = ResizeHub::new();
        {
            let _listener = hub.on_resize(ms(50), |_| {});
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn handler_may_query_hub_while_running() {
        let hub = ResizeHub::new();
        let observed = Rc::new(Cell::new(0usize));
        let (h, o) = (hub.clone(), Rc::clone(&observed));
        let _listener = hub.on_resize(ms(10), move |_| o.set(h.listener_count()));
        hub.notify(ms(0), Viewport::new(10.0, 10.0));
        hub.advance(ms(20));
        assert_eq!(observed.get(), 1);
    }

    #[test]
    fn next_deadline_tracks_pending_bursts() {
        let hub = ResizeHub::new();
        let _listener = hub.on_resize(ms(50), |_| {});
        assert_eq!(hub.next_deadline(), None);
        hub.notify(ms(10), Viewport::new(10.0, 10.0));
        let deadline = hub.next_deadline().expect("pending");
        assert!((deadline.as_millis() - 60.0).abs() < 1e-6);
    }
}
