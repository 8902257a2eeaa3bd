//! Node and scene arena with tree editing and frame traversal
//!
//! Membership rule: a node is a child of a parent when its recorded
//! [`ParentRef`] says so. Child lists are an ordered cache of that. Scene
//! traversal re-checks the back-reference before visiting a top-level entry,
//! so a list entry left behind by a low-level [`Node::set_parent`] is skipped.
//! Node traversal trusts its own list.

use super::{Node, NodeId, ParentRef, Scene, SceneId};
use crate::input::Input;
use slotmap::{SecondaryMap, SlotMap};
use std::fmt;

/// Arena owning every node and scene of a game
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub(super) nodes: SlotMap<NodeId, Node>,
    pub(super) scenes: SlotMap<SceneId, Scene>,
    scene_order: Vec<SceneId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ---- scenes ----

    /// Create and register an empty scene
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        self.add_scene(Scene::new(name))
    }

    /// Register a scene built elsewhere (hooks already set, for instance)
    pub fn add_scene(&mut self, mut scene: Scene) -> SceneId {
        let id = self.scenes.insert_with_key(|id| {
            scene.assign_id(id);
            scene
        });
        self.scene_order.push(id);
        id
    }

    /// Scene by id
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Scene by id, mutably
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// First scene registered under `name`
    pub fn find_scene(&self, name: &str) -> Option<SceneId> {
        self.scene_order
            .iter()
            .copied()
            .find(|&id| self.scenes.get(id).is_some_and(|s| s.name() == name))
    }

    /// Scene ids in registration order
    pub fn scene_ids(&self) -> &[SceneId] {
        &self.scene_order
    }

    /// Whether `id` refers to a registered scene
    pub fn contains_scene(&self, id: SceneId) -> bool {
        self.scenes.contains_key(id)
    }

    // ---- nodes ----

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Node by id, mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether `id` refers to a live node
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node at the top level of `scene`
    ///
    /// Returns `None` if the scene does not exist.
    pub fn create_game_object(
        &mut self,
        scene: SceneId,
        name: impl Into<String>,
    ) -> Option<NodeId> {
        self.create_under(ParentRef::Scene(scene), name.into())
    }

    /// Create a node as the last child of `parent`
    ///
    /// Returns `None` if the parent does not exist.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> Option<NodeId> {
        self.create_under(ParentRef::Node(parent), name.into())
    }

    /// Create a node with no parent
    pub fn create_detached(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        self.nodes.insert_with_key(|id| Node::new(id, name))
    }

    fn create_under(&mut self, parent: ParentRef, name: String) -> Option<NodeId> {
        if !self.contains_parent(parent) {
            log::warn!("Cannot create '{}': parent {:?} does not exist", name, parent);
            return None;
        }
        let id = self.create_detached(name);
        self.attach(parent, id);
        Some(id)
    }

    /// Move `child` under `parent`
    ///
    /// The child is first detached from whatever parent it currently records,
    /// then appended to `parent`'s list. Works for any combination of node and
    /// scene parents. Requests that would make a node its own descendant, or
    /// that name a missing node or parent, are ignored.
    pub fn add_child(&mut self, parent: impl Into<ParentRef>, child: NodeId) {
        let parent = parent.into();
        if !self.contains_parent(parent) || !self.nodes.contains_key(child) {
            log::warn!("Ignoring add_child({:?}, {:?}): unknown id", parent, child);
            return;
        }
        if let ParentRef::Node(parent_node) = parent {
            if self.subtree_contains(child, parent_node) {
                log::warn!(
                    "Ignoring add_child({:?}, {:?}): would create a cycle",
                    parent_node,
                    child
                );
                return;
            }
        }
        self.detach(child);
        self.attach(parent, child);
    }

    /// Remove `child` from `parent`'s list
    ///
    /// No-op if it is not listed there. The child's back-reference is cleared
    /// when it still points at `parent`.
    pub fn remove_child(&mut self, parent: impl Into<ParentRef>, child: NodeId) {
        let parent = parent.into();
        let Some(list) = self.child_list_mut(parent) else {
            return;
        };
        let Some(index) = list.iter().position(|&c| c == child) else {
            return;
        };
        list.remove(index);

        if let Some(node) = self.nodes.get_mut(child) {
            if node.parent() == Some(parent) {
                node.set_parent(None);
            }
        }
    }

    /// First listed child of `parent` named `name`
    pub fn get_child(&self, parent: impl Into<ParentRef>, name: &str) -> Option<NodeId> {
        self.child_list(parent.into())?
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.name() == name))
    }

    /// Recorded parent of a node
    pub fn parent_of(&self, child: NodeId) -> Option<ParentRef> {
        self.nodes.get(child).and_then(Node::parent)
    }

    /// Whether `child` records `parent` as its parent
    pub fn is_child_of(&self, child: NodeId, parent: impl Into<ParentRef>) -> bool {
        self.parent_of(child) == Some(parent.into())
    }

    /// Detach a node and drop it together with its subtree
    ///
    /// Listed children that have since moved to another parent are left alone.
    /// Returns the number of nodes dropped.
    pub fn remove_node(&mut self, id: NodeId) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        self.detach(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            removed += 1;
            stack.extend(
                node.children
                    .iter()
                    .copied()
                    .filter(|&c| self.parent_of(c) == Some(ParentRef::Node(current))),
            );
        }
        removed
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent_of(child) {
            self.remove_child(old_parent, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.set_parent(None);
        }
    }

    fn attach(&mut self, parent: ParentRef, child: NodeId) {
        if let Some(list) = self.child_list_mut(parent) {
            list.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.set_parent(Some(parent));
        }
    }

    fn contains_parent(&self, parent: ParentRef) -> bool {
        match parent {
            ParentRef::Node(id) => self.nodes.contains_key(id),
            ParentRef::Scene(id) => self.scenes.contains_key(id),
        }
    }

    fn child_list(&self, parent: ParentRef) -> Option<&Vec<NodeId>> {
        match parent {
            ParentRef::Node(id) => self.nodes.get(id).map(|n| &n.children),
            ParentRef::Scene(id) => self.scenes.get(id).map(|s| &s.children),
        }
    }

    fn child_list_mut(&mut self, parent: ParentRef) -> Option<&mut Vec<NodeId>> {
        match parent {
            ParentRef::Node(id) => self.nodes.get_mut(id).map(|n| &mut n.children),
            ParentRef::Scene(id) => self.scenes.get_mut(id).map(|s| &mut s.children),
        }
    }

    /// Whether `target` is reachable from `root` through child lists (or is `root`)
    ///
    /// Lists may repeat an id after low-level [`Node::set_parent`] edits, so
    /// each node is expanded once.
    fn subtree_contains(&self, root: NodeId, target: NodeId) -> bool {
        let mut visited = SecondaryMap::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited.insert(current, ()).is_some() {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter().copied().filter(|c| !visited.contains_key(*c)));
            }
        }
        false
    }

    // ---- traversal ----

    /// Run a scene's one-shot setup hook
    pub fn setup(&mut self, scene: SceneId) {
        let Some(mut hook) = self.scenes.get_mut(scene).and_then(|s| s.setup_hook.take()) else {
            return;
        };
        hook(self, scene);
        if let Some(s) = self.scenes.get_mut(scene) {
            if s.setup_hook.is_none() {
                s.setup_hook = Some(hook);
            }
        }
    }

    /// Scene input hook, then every top-level node that still belongs to it
    pub fn handle_input(&mut self, scene: SceneId, input: &dyn Input) {
        if let Some(mut hook) = self.scenes.get_mut(scene).and_then(|s| s.input_hook.take()) {
            hook(self, scene, input);
            if let Some(s) = self.scenes.get_mut(scene) {
                if s.input_hook.is_none() {
                    s.input_hook = Some(hook);
                }
            }
        }
        self.for_each_scene_child(scene, |graph, child| graph.handle_node_input(child, input));
    }

    /// Scene update hook, then every top-level node that still belongs to it
    pub fn update(&mut self, scene: SceneId) {
        if let Some(mut hook) = self.scenes.get_mut(scene).and_then(|s| s.update_hook.take()) {
            hook(self, scene);
            if let Some(s) = self.scenes.get_mut(scene) {
                if s.update_hook.is_none() {
                    s.update_hook = Some(hook);
                }
            }
        }
        self.for_each_scene_child(scene, Self::update_node);
    }

    /// Node input hook, then every listed child
    pub fn handle_node_input(&mut self, id: NodeId, input: &dyn Input) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.run_input_hook(input);
        self.for_each_node_child(id, |graph, child| graph.handle_node_input(child, input));
    }

    /// Node update hook, then every listed child
    pub fn update_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.run_update_hook();
        self.for_each_node_child(id, Self::update_node);
    }

    /// Visit top-level entries of `scene` whose back-reference still names it
    pub(super) fn for_each_scene_child(
        &mut self,
        scene: SceneId,
        mut visit: impl FnMut(&mut Self, NodeId),
    ) {
        let owner = ParentRef::Scene(scene);
        let mut index = 0;
        while let Some(child) = self
            .scenes
            .get(scene)
            .and_then(|s| s.children.get(index).copied())
        {
            index += 1;
            if self.is_child_of(child, owner) {
                visit(self, child);
            }
        }
    }

    /// Visit every listed child of a node
    pub(super) fn for_each_node_child(
        &mut self,
        id: NodeId,
        mut visit: impl FnMut(&mut Self, NodeId),
    ) {
        let mut index = 0;
        while let Some(child) = self.nodes.get(id).and_then(|n| n.children.get(index).copied()) {
            index += 1;
            visit(self, child);
        }
    }

    // ---- diagnostics ----

    /// `Scene <name>:` followed by every listed node, depth first
    pub fn write_scene_report(&self, scene: SceneId, out: &mut dyn fmt::Write) -> fmt::Result {
        let Some(s) = self.scenes.get(scene) else {
            return Ok(());
        };
        writeln!(out, "Scene {}:", s.name())?;
        for &child in &s.children {
            self.write_node_report(child, out)?;
        }
        Ok(())
    }

    /// `<name> -> <tags>` for a node, then its listed children
    pub fn write_node_report(&self, id: NodeId, out: &mut dyn fmt::Write) -> fmt::Result {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        writeln!(out, "{}", node.report_line())?;
        for &child in &node.children {
            self.write_node_report(child, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use crate::input::{InputManager, KeyCode};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn log_updates(graph: &mut SceneGraph, id: NodeId, log: &Log, label: &str) {
        let log = Rc::clone(log);
        let label = label.to_string();
        graph.node_mut(id).unwrap().on_update(move |_| log.borrow_mut().push(label.clone()));
    }

    #[test]
    fn test_create_game_object_sets_parent() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();

        assert_eq!(graph.parent_of(ship), Some(ParentRef::Scene(scene)));
        assert_eq!(graph.scene(scene).unwrap().children(), &[ship]);
        assert_eq!(graph.get_child(scene, "ship"), Some(ship));
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        graph.remove_node(ship);

        assert!(graph.create_child(ship, "gun").is_none());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_reparent_scene_to_node() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        let gun = graph.create_game_object(scene, "gun").unwrap();

        graph.add_child(ship, gun);

        assert_eq!(graph.parent_of(gun), Some(ParentRef::Node(ship)));
        assert_eq!(graph.scene(scene).unwrap().children(), &[ship]);
        assert_eq!(graph.node(ship).unwrap().children(), &[gun]);
    }

    #[test]
    fn test_reparent_node_to_node_and_back_to_scene() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();
        let b = graph.create_game_object(scene, "b").unwrap();
        let child = graph.create_child(a, "child").unwrap();

        graph.add_child(b, child);
        assert!(graph.node(a).unwrap().children().is_empty());
        assert_eq!(graph.node(b).unwrap().children(), &[child]);
        assert!(graph.is_child_of(child, b));

        graph.add_child(scene, child);
        assert!(graph.node(b).unwrap().children().is_empty());
        assert_eq!(graph.scene(scene).unwrap().children(), &[a, b, child]);
        assert!(graph.is_child_of(child, scene));
    }

    #[test]
    fn test_reparent_across_scenes() {
        let mut graph = SceneGraph::new();
        let first = graph.create_scene("first");
        let second = graph.create_scene("second");
        let node = graph.create_game_object(first, "node").unwrap();

        graph.add_child(second, node);

        assert!(graph.scene(first).unwrap().children().is_empty());
        assert_eq!(graph.scene(second).unwrap().children(), &[node]);
        assert_eq!(graph.parent_of(node), Some(ParentRef::Scene(second)));
    }

    #[test]
    fn test_add_child_to_same_parent_moves_to_end() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();
        let b = graph.create_game_object(scene, "b").unwrap();

        graph.add_child(scene, a);

        assert_eq!(graph.scene(scene).unwrap().children(), &[b, a]);
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let root = graph.create_game_object(scene, "root").unwrap();
        let leaf = graph.create_child(root, "leaf").unwrap();

        graph.add_child(leaf, root);
        graph.add_child(root, root);

        assert!(graph.is_child_of(root, scene));
        assert!(graph.is_child_of(leaf, root));
        assert!(graph.node(leaf).unwrap().children().is_empty());
    }

    #[test]
    fn test_cycle_rejected_with_repeated_list_entries() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let root = graph.create_game_object(scene, "root").unwrap();
        let arm = graph.create_child(root, "arm").unwrap();
        let extra = graph.create_child(root, "extra").unwrap();

        // clearing the back-reference lets add_child list `extra` again
        for _ in 0..5 {
            graph.node_mut(extra).unwrap().set_parent(None);
            graph.add_child(root, extra);
        }
        assert_eq!(graph.node(root).unwrap().children().len(), 7);

        graph.add_child(arm, root);

        assert!(graph.is_child_of(root, scene));
        assert!(graph.node(arm).unwrap().children().is_empty());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_remove_child_is_noop_for_non_member() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();
        let b = graph.create_game_object(scene, "b").unwrap();

        graph.remove_child(a, b);

        assert!(graph.is_child_of(b, scene));
        assert_eq!(graph.scene(scene).unwrap().children(), &[a, b]);
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();

        graph.remove_child(scene, a);

        assert!(graph.parent_of(a).is_none());
        assert!(graph.scene(scene).unwrap().children().is_empty());
        assert!(graph.contains_node(a));
    }

    #[test]
    fn test_stale_scene_entry_is_skipped_by_update() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let other = graph.create_game_object(scene, "other").unwrap();
        let a = graph.create_game_object(scene, "a").unwrap();
        let log: Log = Rc::default();
        log_updates(&mut graph, a, &log, "a");

        // back-reference moved without touching the scene's list
        graph.node_mut(a).unwrap().set_parent(Some(ParentRef::Node(other)));
        graph.update(scene);

        assert!(log.borrow().is_empty());
        assert_eq!(graph.scene(scene).unwrap().children(), &[other, a]);
    }

    #[test]
    fn test_update_order_is_hook_then_children_depth_first() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();
        let a1 = graph.create_child(a, "a1").unwrap();
        let b = graph.create_game_object(scene, "b").unwrap();
        let log: Log = Rc::default();

        let scene_log = Rc::clone(&log);
        graph
            .scene_mut(scene)
            .unwrap()
            .on_update(move |_, _| scene_log.borrow_mut().push("scene".into()));
        log_updates(&mut graph, a, &log, "a");
        log_updates(&mut graph, a1, &log, "a1");
        log_updates(&mut graph, b, &log, "b");

        graph.update(scene);

        assert_eq!(*log.borrow(), vec!["scene", "a", "a1", "b"]);
    }

    #[test]
    fn test_input_reaches_nested_nodes() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        let gun = graph.create_child(ship, "gun").unwrap();
        graph.node_mut(gun).unwrap().create_component(ComponentKind::Transform);
        graph.node_mut(gun).unwrap().on_input(|node, input| {
            if input.is_key_down(KeyCode::Right) {
                if let Some(t) = node.transform_mut() {
                    t.rotation += 1.0;
                }
            }
        });

        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Right, true);
        graph.handle_input(scene, &input);

        assert_eq!(graph.node(gun).unwrap().transform().unwrap().rotation, 1.0);
    }

    #[test]
    fn test_scene_setup_hook_can_build_nodes() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        graph.scene_mut(scene).unwrap().on_setup(|graph, scene| {
            let player = graph.create_game_object(scene, "player").unwrap();
            graph.create_child(player, "shadow");
        });

        graph.setup(scene);

        let player = graph.get_child(scene, "player").unwrap();
        assert!(graph.get_child(player, "shadow").is_some());
    }

    #[test]
    fn test_remove_node_drops_subtree_but_not_moved_children() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let a = graph.create_game_object(scene, "a").unwrap();
        let a1 = graph.create_child(a, "a1").unwrap();
        let a2 = graph.create_child(a, "a2").unwrap();
        let keeper = graph.create_game_object(scene, "keeper").unwrap();
        graph.node_mut(a2).unwrap().set_parent(Some(ParentRef::Node(keeper)));

        assert_eq!(graph.remove_node(a), 2);

        assert!(!graph.contains_node(a1));
        assert!(graph.contains_node(a2));
        assert_eq!(graph.scene(scene).unwrap().children(), &[keeper]);
    }

    #[test]
    fn test_find_scene_returns_first_registered() {
        let mut graph = SceneGraph::new();
        let first = graph.create_scene("level");
        let _second = graph.create_scene("level");

        assert_eq!(graph.find_scene("level"), Some(first));
        assert_eq!(graph.find_scene("menu"), None);
    }

    #[test]
    fn test_scene_report() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        graph.node_mut(ship).unwrap().create_component(ComponentKind::Transform);
        let gun = graph.create_child(ship, "gun").unwrap();
        graph.node_mut(gun).unwrap().create_component(ComponentKind::Sprite);

        let mut out = String::new();
        graph.write_scene_report(scene, &mut out).unwrap();

        assert_eq!(out, "Scene main:\nship -> transform\ngun -> sprite\n");
    }
}
