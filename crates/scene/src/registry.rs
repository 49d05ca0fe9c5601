use std::rc::Rc;

use crate::renderer::SceneRenderer;

/// Ordered scene table; a scene's position is its navigation index.
#[derive(Clone, Default)]
pub struct SceneRegistry {
    scenes: Vec<Rc<dyn SceneRenderer>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, scene: impl SceneRenderer + 'static) -> Self {
        self.register(scene);
        self
    }

    /// Appends `scene`; returns its index.
    pub fn register(&mut self, scene: impl SceneRenderer + 'static) -> usize {
        self.scenes.push(Rc::new(scene));
        self.scenes.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<Rc<dyn SceneRenderer>> {
        self.scenes.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|s| s.id()).collect()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id() == id)
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("scenes", &self.ids())
            .finish()
    }
}
