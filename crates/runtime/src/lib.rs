pub mod debounce;
pub mod event_bus;
pub mod metrics;
pub mod resize;

pub use debounce::*;
pub use event_bus::*;
pub use resize::*;
