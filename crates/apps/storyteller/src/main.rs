mod cli;
mod headless;
mod http_source;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use clap::Parser;
use formats::{
    DatasetManifest, FilesystemSource, LoadOptions, MANIFEST_FILE_NAME, ResourceSource,
};
use foundation::math::Vec2;
use foundation::time::Time;
use foundation::viewport::Viewport;
use layers::default_registry;
use scene::{PointerEvent, SceneManager, StoryConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, resolve_scene};
use crate::headless::{HeadlessTarget, Snapshot};
use crate::http_source::HttpSource;

/// Spacing between replayed resize events; well inside any sane debounce window.
const RESIZE_STEP_MS: u64 = 10;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main().await {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let registry = default_registry();
    if let Command::List = args.command {
        for (i, id) in registry.ids().iter().enumerate() {
            println!("{}\t{id}", i + 1);
        }
        return Ok(());
    }

    let config = load_config(&args).await?;
    let source: Box<dyn ResourceSource> = match &args.base_url {
        Some(url) => Box::new(HttpSource::new(url.as_str())),
        None => Box::new(FilesystemSource::new(&args.data_dir)),
    };
    let manifest_text = source
        .fetch(MANIFEST_FILE_NAME)
        .await
        .map_err(|e| e.to_string())?;
    let manifest = DatasetManifest::from_json_str(&manifest_text)
        .map_err(|e| format!("{MANIFEST_FILE_NAME}: {e}"))?;
    let options = LoadOptions {
        latitude_limit: config.latitude_limit_deg,
        ..LoadOptions::default()
    };
    let bundle = formats::load(source.as_ref(), &manifest, &options)
        .await
        .map_err(|e| format!("loading story data failed: {e}"))?;
    info!(
        name = manifest.name.as_deref().unwrap_or("unnamed"),
        periods = bundle.immigration.records.len(),
        regions = bundle.boundaries.len(),
        "story data loaded"
    );

    let target = Rc::new(RefCell::new(HeadlessTarget::new()));
    let mut manager = SceneManager::new(registry, config, target.clone(), args.viewport);
    manager
        .attach_bundle(Rc::new(bundle))
        .map_err(|e| e.to_string())?;

    match args.command {
        Command::List => {}
        Command::Tour => {
            manager.load_scene(0).map_err(|e| e.to_string())?;
            while manager.next().map_err(|e| e.to_string())? {}
        }
        Command::Scene {
            scene,
            click,
            hover,
            resize,
        } => {
            let index = resolve_scene(manager.registry(), &scene)?;
            manager.go_to(index).map_err(|e| e.to_string())?;
            for key in click {
                let outcome = manager
                    .pointer(&PointerEvent::click(key.as_str()))
                    .map_err(|e| e.to_string())?;
                info!(key = %key, ?outcome, "click");
            }
            if let Some(key) = hover {
                let outcome = manager
                    .pointer(&PointerEvent::enter(key.as_str(), Vec2::default()))
                    .map_err(|e| e.to_string())?;
                info!(key = %key, ?outcome, "hover");
            }
            replay_resizes(&manager, &resize);
        }
    }
    manager.teardown();

    let snapshots = target.borrow_mut().take_snapshots();
    write_snapshots(&snapshots, args.out.as_deref()).await
}

async fn load_config(args: &Args) -> Result<StoryConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("read {path:?}: {e}"))?;
            StoryConfig::from_json_str(&text).map_err(|e| format!("parse {path:?}: {e}"))?
        }
        None => StoryConfig::default(),
    };
    if let Some(ms) = args.debounce_ms {
        config.resize_debounce_ms = ms;
    }
    if let Some(px) = args.breakpoint_px {
        config.layout_breakpoint_px = px;
    }
    Ok(config)
}

/// Feeds `viewports` as one burst, then lets the debounce window elapse.
fn replay_resizes(manager: &SceneManager, viewports: &[Viewport]) {
    if viewports.is_empty() {
        return;
    }
    let mut now = 0;
    for viewport in viewports {
        manager.notify_resize(Time::from_millis(now), *viewport);
        now += RESIZE_STEP_MS;
    }
    let Some(deadline) = manager.hub().next_deadline() else {
        warn!("resize burst left nothing pending");
        return;
    };
    let fired = manager.advance(deadline);
    if fired == 0 {
        warn!("resize burst produced no redraw");
    }
    info!(events = viewports.len(), fired, "resize burst replayed");
}

async fn write_snapshots(snapshots: &[Snapshot], out: Option<&Path>) -> Result<(), String> {
    let Some(dir) = out else {
        let json = serde_json::to_string_pretty(snapshots).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("create {dir:?}: {e}"))?;
    for snapshot in snapshots {
        let path = dir.join(snapshot.file_name());
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| e.to_string())?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| format!("write {path:?}: {e}"))?;
    }
    info!(count = snapshots.len(), dir = ?dir, "snapshots written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::replay_resizes;
    use crate::headless::HeadlessTarget;
    use formats::{DatasetManifest, FilesystemSource, LoadOptions};
    use foundation::viewport::Viewport;
    use layers::default_registry;
    use pretty_assertions::assert_eq;
    use scene::{SceneManager, StoryConfig};

    #[tokio::test]
    async fn resize_burst_redraws_once_at_the_deadline() {
        let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let bundle = formats::load(
            &FilesystemSource::new(&assets),
            &DatasetManifest::default(),
            &LoadOptions::default(),
        )
        .await
        .expect("load assets");

        let target = Rc::new(RefCell::new(HeadlessTarget::new()));
        let mut manager = SceneManager::new(
            default_registry(),
            StoryConfig::default(),
            target.clone(),
            Viewport::new(1000.0, 500.0),
        );
        manager.attach_bundle(Rc::new(bundle)).expect("attach");
        manager.go_to(0).expect("first scene");

        replay_resizes(
            &manager,
            &[Viewport::new(900.0, 500.0), Viewport::new(640.0, 480.0)],
        );
        assert_eq!(manager.hub().next_deadline(), None);

        let snapshots = target.borrow_mut().take_snapshots();
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[0].animated);
        assert!(!snapshots[1].animated);
        assert_eq!(snapshots[1].drawing.viewport.width_px, 640.0);
    }
}
