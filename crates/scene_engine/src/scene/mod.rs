//! Scene graph
//!
//! Nodes and scenes live in one arena, [`SceneGraph`], and refer to each other
//! by generational ids. A parent owns its children through its child list; a
//! child only records which parent it belongs to ([`ParentRef`]), and that
//! record is the source of truth for membership.
//!
//! ## Frame traversal
//!
//! ```text
//! Scene hook ─┬─> Node hook ──> child Node hook ...
//!             └─> Node hook ...
//! ```
//!
//! Rendering additionally wraps each node's subtree in its components:
//! transform outermost, then sprite, then the node's own hook and children.

mod node;
mod root;
mod scene_graph;
mod scene_renderer;

pub use node::{Node, NodeInputHook, NodeRenderHook, NodeUpdateHook};
pub use root::{Scene, SceneHook, SceneInputHook, SceneRenderHook};
pub use scene_graph::SceneGraph;

slotmap::new_key_type! {
    /// Identifier of a node inside a [`SceneGraph`]
    pub struct NodeId;

    /// Identifier of a scene inside a [`SceneGraph`]
    pub struct SceneId;
}

/// Non-owning reference from a node to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Parent is another node
    Node(NodeId),
    /// Node sits at the top level of a scene
    Scene(SceneId),
}

impl From<NodeId> for ParentRef {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<SceneId> for ParentRef {
    fn from(id: SceneId) -> Self {
        Self::Scene(id)
    }
}
