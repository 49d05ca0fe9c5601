//! Chart scenes of the story: scales, projection, shared symbology and one
//! module per chart.

pub mod axes;
pub mod bar_pie;
pub mod choropleth;
pub mod multi_line;
pub mod projection;
pub mod scales;
pub mod scatter;
pub mod story;
pub mod symbology;

#[cfg(test)]
mod fixtures;

pub use bar_pie::ImmigrationChart;
pub use choropleth::HealthChart;
pub use multi_line::{Callout, HousingChart};
pub use scatter::UnemploymentChart;
pub use story::{SCENE_IDS, default_registry};
