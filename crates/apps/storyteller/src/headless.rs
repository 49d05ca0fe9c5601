//! Render target that keeps JSON-ready snapshots instead of drawing.

use scene::{Drawing, RenderTarget, Tooltip};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub sequence: usize,
    pub scene: usize,
    pub caption: Option<String>,
    pub animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    pub drawing: Drawing,
}

impl Snapshot {
    /// `003-housing.json`
    pub fn file_name(&self) -> String {
        format!("{:03}-{}.json", self.sequence, self.drawing.scene)
    }
}

/// One snapshot per mount. Tooltip changes are folded into the latest
/// snapshot of the same scene.
#[derive(Debug, Default)]
pub struct HeadlessTarget {
    caption: Option<String>,
    mounted: Option<usize>,
    snapshots: Vec<Snapshot>,
}

impl HeadlessTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn take_snapshots(&mut self) -> Vec<Snapshot> {
        std::mem::take(&mut self.snapshots)
    }
}

impl RenderTarget for HeadlessTarget {
    fn mount(&mut self, scene: usize, drawing: &Drawing) {
        let sequence = self.snapshots.len();
        debug!(sequence, scene, marks = drawing.marks.len(), "snapshot");
        self.mounted = Some(scene);
        self.snapshots.push(Snapshot {
            sequence,
            scene,
            caption: self.caption.clone(),
            animated: drawing.is_animated(),
            tooltip: None,
            drawing: drawing.clone(),
        });
    }

    fn unmount(&mut self, scene: usize) {
        if self.mounted == Some(scene) {
            self.mounted = None;
        }
    }

    fn clear(&mut self) {
        self.mounted = None;
    }

    fn set_caption(&mut self, caption: Option<&str>) {
        self.caption = caption.map(str::to_string);
    }

    fn set_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        let Some(scene) = self.mounted else {
            return;
        };
        if let Some(last) = self.snapshots.last_mut().filter(|s| s.scene == scene) {
            last.tooltip = tooltip.cloned();
        }
    }
}
