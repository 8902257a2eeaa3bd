//! Scene: the root container of a node hierarchy

use super::{NodeId, SceneGraph, SceneId};
use crate::input::Input;
use crate::render::Canvas;
use std::fmt;

/// Setup or update hook of a scene
///
/// Receives the whole graph so it can create and rearrange nodes.
pub type SceneHook = Box<dyn FnMut(&mut SceneGraph, SceneId)>;

/// Input hook of a scene
pub type SceneInputHook = Box<dyn FnMut(&mut SceneGraph, SceneId, &dyn Input)>;

/// Render hook of a scene, called before any node draws
pub type SceneRenderHook = Box<dyn FnMut(&mut dyn Canvas, f64)>;

/// Hierarchy root owning top-level nodes
///
/// Unlike a node, a scene has no parent and no components. It adds a one-shot
/// setup hook, run by the loop driver before the first frame.
pub struct Scene {
    id: SceneId,
    name: String,
    pub(super) children: Vec<NodeId>,
    pub(super) setup_hook: Option<SceneHook>,
    pub(super) input_hook: Option<SceneInputHook>,
    pub(super) update_hook: Option<SceneHook>,
    pub(super) render_hook: Option<SceneRenderHook>,
}

impl Scene {
    /// Create a detached scene; it gets its id when added to a graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SceneId::default(),
            name: name.into(),
            children: Vec::new(),
            setup_hook: None,
            input_hook: None,
            update_hook: None,
            render_hook: None,
        }
    }

    pub(super) fn assign_id(&mut self, id: SceneId) {
        self.id = id;
    }

    /// Arena id (null until added to a graph)
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level child ids in order, including entries whose parent has moved on
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Replace the setup hook
    pub fn on_setup(&mut self, hook: impl FnMut(&mut SceneGraph, SceneId) + 'static) {
        self.setup_hook = Some(Box::new(hook));
    }

    /// Replace the input hook
    pub fn on_input(&mut self, hook: impl FnMut(&mut SceneGraph, SceneId, &dyn Input) + 'static) {
        self.input_hook = Some(Box::new(hook));
    }

    /// Replace the update hook
    pub fn on_update(&mut self, hook: impl FnMut(&mut SceneGraph, SceneId) + 'static) {
        self.update_hook = Some(Box::new(hook));
    }

    /// Replace the render hook
    pub fn on_render(&mut self, hook: impl FnMut(&mut dyn Canvas, f64) + 'static) {
        self.render_hook = Some(Box::new(hook));
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("children", &self.children)
            .field("has_setup_hook", &self.setup_hook.is_some())
            .field("has_input_hook", &self.input_hook.is_some())
            .field("has_update_hook", &self.update_hook.is_some())
            .field("has_render_hook", &self.render_hook.is_some())
            .finish()
    }
}
