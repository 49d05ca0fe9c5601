//! The four-scene story in navigation order.

use scene::{ChartScene, SceneRegistry};

use crate::bar_pie::ImmigrationChart;
use crate::choropleth::HealthChart;
use crate::multi_line::HousingChart;
use crate::scatter::UnemploymentChart;

pub const SCENE_IDS: [&str; 4] = ["immigration", "housing", "unemployment", "health"];

pub fn default_registry() -> SceneRegistry {
    SceneRegistry::new()
        .with(ChartScene::new(ImmigrationChart))
        .with(ChartScene::new(HousingChart))
        .with(ChartScene::new(UnemploymentChart))
        .with(ChartScene::new(HealthChart))
}
