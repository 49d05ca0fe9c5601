/// Counters kept by the [`ResizeHub`](crate::resize::ResizeHub) for
/// instrumentation and leak checks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ResizeMetrics {
    /// Raw viewport events received.
    pub events: u64,
    /// Debounced handler invocations.
    pub redraws: u64,
    pub attached: u64,
    pub detached: u64,
}

impl ResizeMetrics {
    /// Listeners attached and not yet detached.
    pub fn live(&self) -> u64 {
        self.attached.saturating_sub(self.detached)
    }
}

#[cfg(test)]
mod tests {
    use super::ResizeMetrics;

    #[test]
    fn live_is_attached_minus_detached() {
        let m = ResizeMetrics {
            attached: 3,
            detached: 2,
            ..Default::default()
        };
        assert_eq!(m.live(), 1);
        assert_eq!(ResizeMetrics::default().live(), 0);
    }
}
