//! Scene-graph node

use super::{NodeId, ParentRef};
use crate::components::{Component, ComponentKind, Sprite, Transform};
use crate::input::Input;
use crate::render::Canvas;
use std::fmt;

/// Per-frame input hook of a node
pub type NodeInputHook = Box<dyn FnMut(&mut Node, &dyn Input)>;

/// Fixed-step update hook of a node
pub type NodeUpdateHook = Box<dyn FnMut(&mut Node)>;

/// Render hook of a node, called with the interpolation factor
pub type NodeRenderHook = Box<dyn FnMut(&Node, &mut dyn Canvas, f64)>;

/// Scene-graph entity with components, children and per-frame hooks
///
/// Nodes are created through [`SceneGraph`](super::SceneGraph) factories, which
/// assign the id and attach the node to its parent. Tree edits that touch
/// more than one node (adding or removing children) also go through the graph.
pub struct Node {
    id: NodeId,
    name: String,
    components: Vec<Component>,
    pub(super) children: Vec<NodeId>,
    parent: Option<ParentRef>,
    pub(super) input_hook: Option<NodeInputHook>,
    pub(super) update_hook: Option<NodeUpdateHook>,
    pub(super) render_hook: Option<NodeRenderHook>,
}

impl Node {
    pub(super) fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            components: Vec::new(),
            children: Vec::new(),
            parent: None,
            input_hook: None,
            update_hook: None,
            render_hook: None,
        }
    }

    /// Arena id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name (not required to be unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Create a default-valued component, attach it, and return it
    ///
    /// Duplicates are allowed; lookups return the first match.
    pub fn create_component(&mut self, kind: ComponentKind) -> &mut Component {
        self.add_component(Component::new(kind))
    }

    /// Attach an already-built component
    pub fn add_component(&mut self, component: impl Into<Component>) -> &mut Component {
        let mut component = component.into();
        component.set_parent(self.id);
        let index = self.components.len();
        self.components.push(component);
        &mut self.components[index]
    }

    /// Whether a component of this kind is attached
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind() == kind)
    }

    /// First component of this kind
    pub fn get_component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    /// First component of this kind, mutably
    pub fn get_component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.kind() == kind)
    }

    /// Attached components in insertion order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// First transform
    pub fn transform(&self) -> Option<&Transform> {
        self.components.iter().find_map(Component::as_transform)
    }

    /// First transform, mutably
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.components.iter_mut().find_map(Component::as_transform_mut)
    }

    /// First sprite
    pub fn sprite(&self) -> Option<&Sprite> {
        self.components.iter().find_map(Component::as_sprite)
    }

    /// First sprite, mutably
    pub fn sprite_mut(&mut self) -> Option<&mut Sprite> {
        self.components.iter_mut().find_map(Component::as_sprite_mut)
    }

    /// Child ids in order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Current parent
    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    /// Overwrite the parent back-reference
    ///
    /// Child lists are left untouched. Use [`SceneGraph::add_child`](super::SceneGraph::add_child)
    /// to move a node; this is the low-level escape hatch.
    pub fn set_parent(&mut self, parent: Option<ParentRef>) {
        self.parent = parent;
    }

    /// Replace the input hook
    pub fn on_input(&mut self, hook: impl FnMut(&mut Node, &dyn Input) + 'static) {
        self.input_hook = Some(Box::new(hook));
    }

    /// Replace the update hook
    pub fn on_update(&mut self, hook: impl FnMut(&mut Node) + 'static) {
        self.update_hook = Some(Box::new(hook));
    }

    /// Replace the render hook
    pub fn on_render(&mut self, hook: impl FnMut(&Node, &mut dyn Canvas, f64) + 'static) {
        self.render_hook = Some(Box::new(hook));
    }

    /// Run the input hook, if any
    pub(super) fn run_input_hook(&mut self, input: &dyn Input) {
        if let Some(mut hook) = self.input_hook.take() {
            hook(self, input);
            // a hook may install its own replacement
            if self.input_hook.is_none() {
                self.input_hook = Some(hook);
            }
        }
    }

    /// Run the update hook, if any
    pub(super) fn run_update_hook(&mut self) {
        if let Some(mut hook) = self.update_hook.take() {
            hook(self);
            if self.update_hook.is_none() {
                self.update_hook = Some(hook);
            }
        }
    }

    /// Run the render hook, if any
    pub(super) fn run_render_hook(&mut self, canvas: &mut dyn Canvas, interpolation: f64) {
        if let Some(mut hook) = self.render_hook.take() {
            hook(self, canvas, interpolation);
            self.render_hook = Some(hook);
        }
    }

    /// `<name> -> <tag>, <tag>`
    pub fn report_line(&self) -> String {
        let tags: Vec<&str> = self.components.iter().map(|c| c.kind().as_str()).collect();
        format!("{} -> {}", self.name, tags.join(", "))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("components", &self.components)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("has_input_hook", &self.input_hook.is_some())
            .field("has_update_hook", &self.update_hook.is_some())
            .field("has_render_hook", &self.render_hook.is_some())
            .finish()
    }
}
