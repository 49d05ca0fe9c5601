use foundation::time::Time;

/// Trailing-edge debouncer.
///
/// Every `trigger` pushes the deadline to `now + window`; `poll` reports
/// `true` exactly once when the clock reaches the deadline, collapsing a burst
/// into a single action.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    window: Time,
    deadline: Option<Time>,
}

impl Debouncer {
    pub fn new(window: Time) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Time {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    pub fn trigger(&mut self, now: Time) {
        self.deadline = Some(now.after(self.window));
    }

    /// Returns `true` when a pending burst has been quiet for the full window.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if now.0 >= deadline.0 => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
