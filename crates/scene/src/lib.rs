pub mod animation;
pub mod chart;
pub mod config;
pub mod drawing;
pub mod layout;
pub mod manager;
pub mod navigation;
pub mod registry;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod state;
pub mod target;
pub mod tooltip;

pub use animation::*;
pub use chart::*;
pub use config::*;
pub use drawing::*;
pub use layout::*;
pub use manager::*;
pub use navigation::*;
pub use registry::*;
pub use renderer::*;
pub use selection::*;
pub use session::*;
pub use state::*;
pub use target::*;
pub use tooltip::*;
