//! Render traversal
//!
//! Each node builds one continuation for its subtree and runs it once:
//!
//! ```text
//! transform.apply_transform(        // translate, rotate, scale
//!     sprite.render_image(          // draw image centered on origin
//!         own render hook + children))
//! ```
//!
//! Missing components contribute no layer.

use super::{NodeId, SceneGraph, SceneId};
use crate::components::RenderContinuation;
use crate::render::Canvas;

impl SceneGraph {
    /// Scene render hook, then every top-level node that still belongs to it
    pub fn render(&mut self, scene: SceneId, canvas: &mut dyn Canvas, interpolation: f64) {
        if let Some(mut hook) = self.scenes.get_mut(scene).and_then(|s| s.render_hook.take()) {
            hook(canvas, interpolation);
            if let Some(s) = self.scenes.get_mut(scene) {
                if s.render_hook.is_none() {
                    s.render_hook = Some(hook);
                }
            }
        }
        self.for_each_scene_child(scene, |graph, child| {
            graph.render_node(child, canvas, interpolation);
        });
    }

    /// Render one node and its subtree through its component wrappers
    pub fn render_node(&mut self, id: NodeId, canvas: &mut dyn Canvas, interpolation: f64) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let sprite = node.sprite().copied();
        let transform = node.transform().copied();

        let mut draw: RenderContinuation<'_> =
            Box::new(move |canvas: &mut dyn Canvas, interpolation: f64| {
                self.render_subtree(id, canvas, interpolation);
            });
        if let Some(sprite) = sprite {
            draw = sprite.render_image(draw);
        }
        if let Some(transform) = transform {
            draw = transform.apply_transform(draw);
        }

        draw(canvas, interpolation);
    }

    fn render_subtree(&mut self, id: NodeId, canvas: &mut dyn Canvas, interpolation: f64) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.run_render_hook(canvas, interpolation);
        self.for_each_node_child(id, |graph, child| {
            graph.render_node(child, canvas, interpolation);
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::assets::{ImageHandle, ImageKey};
    use crate::components::{ComponentKind, Sprite, Transform};
    use crate::foundation::math::Vec2;
    use crate::render::{DrawCommand, RecordingCanvas};
    use crate::scene::SceneGraph;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn image(width: u32, height: u32) -> ImageHandle {
        ImageHandle::new(ImageKey::default(), width, height)
    }

    #[test]
    fn test_transform_then_sprite_then_hook() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        {
            let node = graph.node_mut(ship).unwrap();
            node.add_component(Transform::from_position(Vec2::new(10.0, 0.0)));
            node.add_component(Sprite::with_image(image(20, 10)));
            node.on_render(|node, canvas, _| {
                canvas.rotate(9.0);
                assert_eq!(node.name(), "ship");
            });
        }

        let mut canvas = RecordingCanvas::new();
        graph.render(scene, &mut canvas, 0.5);

        assert_eq!(
            canvas.commands(),
            &[
                DrawCommand::Translate(Vec2::new(10.0, 0.0)),
                DrawCommand::Rotate(0.0),
                DrawCommand::Scale(Vec2::new(1.0, 1.0)),
                DrawCommand::DrawImage {
                    image: image(20, 10),
                    x: -10.0,
                    y: -5.0,
                    w: 20.0,
                    h: 10.0,
                },
                DrawCommand::Rotate(9.0),
            ]
        );
    }

    #[test]
    fn test_component_insertion_order_does_not_change_wrap_order() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        {
            let node = graph.node_mut(ship).unwrap();
            node.add_component(Sprite::with_image(image(4, 4)));
            node.add_component(Transform::from_position(Vec2::new(1.0, 2.0)));
        }

        let mut canvas = RecordingCanvas::new();
        graph.render(scene, &mut canvas, 0.0);
        graph.render(scene, &mut canvas, 0.0);

        let kinds: Vec<&str> = canvas
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::Translate(_) => "t",
                DrawCommand::Rotate(_) => "r",
                DrawCommand::Scale(_) => "s",
                DrawCommand::DrawImage { .. } => "img",
                DrawCommand::Marker(_) => "m",
            })
            .collect();
        assert_eq!(kinds, vec!["t", "r", "s", "img", "t", "r", "s", "img"]);
    }

    #[test]
    fn test_node_without_components_runs_hook_and_children() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let group = graph.create_game_object(scene, "group").unwrap();
        let child = graph.create_child(group, "child").unwrap();
        graph.node_mut(group).unwrap().create_component(ComponentKind::None);
        graph.node_mut(child).unwrap().add_component(Sprite::with_image(image(2, 2)));

        let mut canvas = RecordingCanvas::new();
        graph.render(scene, &mut canvas, 0.0);

        assert_eq!(
            canvas.commands(),
            &[DrawCommand::DrawImage { image: image(2, 2), x: -1.0, y: -1.0, w: 2.0, h: 2.0 }]
        );
    }

    #[test]
    fn test_child_draws_in_parent_space() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let parent = graph.create_game_object(scene, "parent").unwrap();
        let child = graph.create_child(parent, "child").unwrap();
        graph.node_mut(parent).unwrap().add_component(
            Transform::from_position(Vec2::new(100.0, 0.0)).with_scale(Vec2::new(2.0, 2.0)),
        );
        graph.node_mut(child).unwrap().add_component(Transform::from_position(Vec2::new(5.0, 0.0)));
        graph.scene_mut(scene).unwrap().on_render(|canvas, _| canvas.rotate(0.0));

        let mut canvas = RecordingCanvas::new();
        graph.render(scene, &mut canvas, 0.0);

        // parent: translate 100, scale 2; child: translate 5 in scaled space
        let origin = canvas.to_canvas(Vec2::zeros());
        assert_relative_eq!(origin.x, 110.0, epsilon = 1e-4);
        assert_eq!(canvas.commands()[0], DrawCommand::Rotate(0.0));
    }

    #[test]
    fn test_render_hook_receives_interpolation() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        let seen = Rc::new(Cell::new(-1.0));
        let s = Rc::clone(&seen);
        graph.node_mut(ship).unwrap().on_render(move |_, _, interpolation| s.set(interpolation));

        graph.render(scene, &mut RecordingCanvas::new(), 0.25);

        assert_eq!(seen.get(), 0.25);
    }

    #[test]
    fn test_stale_entry_is_not_rendered() {
        let mut graph = SceneGraph::new();
        let scene = graph.create_scene("main");
        let ship = graph.create_game_object(scene, "ship").unwrap();
        graph.node_mut(ship).unwrap().add_component(Sprite::with_image(image(2, 2)));
        graph.node_mut(ship).unwrap().set_parent(None);

        let mut canvas = RecordingCanvas::new();
        graph.render(scene, &mut canvas, 0.0);

        assert!(canvas.commands().is_empty());
    }
}
