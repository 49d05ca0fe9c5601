use std::cell::RefCell;
use std::rc::Rc;

use crate::drawing::Drawing;
use crate::tooltip::Tooltip;

/// Where scenes are drawn. The page shell (DOM, terminal, snapshot file)
/// implements this; the core never touches pixels directly.
pub trait RenderTarget {
    /// Replaces whatever `scene` currently shows with `drawing`.
    fn mount(&mut self, scene: usize, drawing: &Drawing);
    fn unmount(&mut self, scene: usize);
    /// Empties the container.
    fn clear(&mut self);
    fn set_caption(&mut self, caption: Option<&str>);
    fn set_tooltip(&mut self, tooltip: Option<&Tooltip>);
}

pub type SharedTarget = Rc<RefCell<dyn RenderTarget>>;

#[derive(Debug, Clone, PartialEq)]
pub enum TargetCall {
    Mount { scene: usize, marks: usize, animated: bool },
    Unmount { scene: usize },
    Clear,
    Caption(Option<String>),
    Tooltip(Option<String>),
}

/// Keeps the last mounted drawing plus a log of every call.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<TargetCall>,
    pub current: Option<(usize, Drawing)>,
    pub caption: Option<String>,
    pub tooltip: Option<Tooltip>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<RecordingTarget>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.current.as_ref().map(|(_, d)| d)
    }

    pub fn mount_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TargetCall::Mount { .. }))
            .count()
    }
}

impl RenderTarget for RecordingTarget {
    fn mount(&mut self, scene: usize, drawing: &Drawing) {
        self.calls.push(TargetCall::Mount {
            scene,
            marks: drawing.marks.len(),
            animated: drawing.is_animated(),
        });
        self.current = Some((scene, drawing.clone()));
    }

    fn unmount(&mut self, scene: usize) {
        self.calls.push(TargetCall::Unmount { scene });
        if self.current.as_ref().is_some_and(|(s, _)| *s == scene) {
            self.current = None;
        }
    }

    fn clear(&mut self) {
        self.calls.push(TargetCall::Clear);
        self.current = None;
    }

    fn set_caption(&mut self, caption: Option<&str>) {
        self.calls.push(TargetCall::Caption(caption.map(str::to_string)));
        self.caption = caption.map(str::to_string);
    }

    fn set_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        self.calls.push(TargetCall::Tooltip(tooltip.map(Tooltip::text)));
        self.tooltip = tooltip.cloned();
    }
}
