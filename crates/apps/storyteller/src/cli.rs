use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::viewport::Viewport;
use scene::SceneRegistry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless runner for the chart story")]
pub struct Args {
    /// Directory holding story.manifest.json and the data files
    #[arg(long, env = "STORY_DATA_DIR", default_value = "crates/apps/storyteller/assets")]
    pub data_dir: PathBuf,

    /// Fetch resources from this base URL instead of the data directory
    #[arg(long, env = "STORY_BASE_URL")]
    pub base_url: Option<String>,

    /// JSON file with story tunables; missing fields keep their defaults
    #[arg(long, env = "STORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the resize debounce window
    #[arg(long, env = "STORY_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Overrides the wide/narrow layout breakpoint
    #[arg(long, env = "STORY_BREAKPOINT_PX")]
    pub breakpoint_px: Option<f64>,

    /// Initial viewport, WIDTHxHEIGHT
    #[arg(long, env = "STORY_VIEWPORT", default_value = "1000x500", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Write one snapshot file per mount into this directory instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print scene positions and ids
    List,

    /// Mount every scene in order
    Tour,

    /// Mount one scene and optionally interact with it
    Scene {
        /// Scene id (e.g. "housing") or 1-based position
        scene: String,

        /// Mark keys to click, in order (e.g. bar:2008)
        #[arg(long)]
        click: Vec<String>,

        /// Mark key to hover after the clicks
        #[arg(long)]
        hover: Option<String>,

        /// Viewports replayed as one resize burst, comma separated
        #[arg(long, value_delimiter = ',', value_parser = parse_viewport)]
        resize: Vec<Viewport>,
    },
}

pub fn parse_viewport(raw: &str) -> Result<Viewport, String> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("bad width in {raw:?}"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("bad height in {raw:?}"))?;
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(format!("viewport must be positive, got {raw:?}"));
    }
    Ok(Viewport::new(w, h))
}

/// Scene index from an id or a 1-based position.
pub fn resolve_scene(registry: &SceneRegistry, raw: &str) -> Result<usize, String> {
    if let Some(index) = registry.index_of(raw) {
        return Ok(index);
    }
    match raw.parse::<usize>() {
        Ok(n) if (1..=registry.len()).contains(&n) => Ok(n - 1),
        _ => Err(format!(
            "unknown scene {raw:?}; expected one of {} or 1..={}",
            registry.ids().join(", "),
            registry.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, parse_viewport, resolve_scene};
    use clap::Parser;
    use foundation::viewport::Viewport;
    use layers::default_registry;
    use pretty_assertions::assert_eq;

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("800x450"), Ok(Viewport::new(800.0, 450.0)));
        assert_eq!(parse_viewport(" 640X480 "), Ok(Viewport::new(640.0, 480.0)));
        assert!(parse_viewport("800").is_err());
        assert!(parse_viewport("0x450").is_err());
    }

    #[test]
    fn scenes_resolve_by_id_or_position() {
        let registry = default_registry();
        assert_eq!(resolve_scene(&registry, "housing"), Ok(1));
        assert_eq!(resolve_scene(&registry, "4"), Ok(3));
        assert!(resolve_scene(&registry, "0").is_err());
        assert!(resolve_scene(&registry, "weather").is_err());
    }

    #[test]
    fn scene_command_takes_a_resize_burst() {
        let args = Args::try_parse_from([
            "storyteller",
            "scene",
            "immigration",
            "--click",
            "bar:2008",
            "--resize",
            "900x500,600x500",
        ])
        .expect("parse");
        match args.command {
            Command::Scene { scene, click, resize, hover } => {
                assert_eq!(scene, "immigration");
                assert_eq!(click, vec!["bar:2008".to_string()]);
                assert_eq!(resize, vec![Viewport::new(900.0, 500.0), Viewport::new(600.0, 500.0)]);
                assert!(hover.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
