use serde::Serialize;

/// Navigation controls as the page shell should show them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub current: Option<usize>,
    pub count: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl NavState {
    pub fn new(current: Option<usize>, count: usize) -> Self {
        Self {
            current,
            count,
            can_previous: current.is_some_and(|i| i > 0),
            can_next: match current {
                Some(i) => i + 1 < count,
                None => count > 0,
            },
        }
    }

    /// 1-based indicator, e.g. `"Scene 2 of 4"`.
    pub fn label(&self) -> String {
        match self.current {
            Some(i) => format!("Scene {} of {}", i + 1, self.count),
            None => format!("Scene - of {}", self.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NavState;

    #[test]
    fn ends_disable_their_button() {
        let first = NavState::new(Some(0), 4);
        assert!(!first.can_previous && first.can_next);
        let last = NavState::new(Some(3), 4);
        assert!(last.can_previous && !last.can_next);
        assert_eq!(last.label(), "Scene 4 of 4");
    }

    #[test]
    fn nothing_mounted() {
        let nav = NavState::new(None, 4);
        assert!(!nav.can_previous && nav.can_next);
        assert!(!NavState::new(None, 0).can_next);
    }
}
