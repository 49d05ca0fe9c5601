/// Monotonic id for listeners and other short-lived registrations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(n: u64) -> Self {
        ListenerId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out ids in increasing order; ids are never reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
