//! # Scene Engine
//!
//! A small 2D scene-graph game loop, independent of any particular window or
//! drawing backend.
//!
//! ## Features
//!
//! - **Scene Graph**: Nodes in parent/child trees under named scenes
//! - **Components**: Transform and sprite layers wrapped around each subtree render
//! - **Fixed Timestep**: Bounded catch-up updates with interpolated rendering
//! - **Host Services**: Clock, canvas, input and image loading as traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = Game::new(SystemClock::new());
//!     let level = game.create_scene("level");
//!
//!     let ship = game.graph_mut().create_game_object(level, "ship").unwrap();
//!     let node = game.graph_mut().node_mut(ship).unwrap();
//!     node.add_component(Transform::from_position(Vec2::new(100.0, 50.0)));
//!     node.on_update(|node| {
//!         if let Some(transform) = node.transform_mut() {
//!             transform.rotation += 0.05;
//!         }
//!     });
//!
//!     game.set_current_scene("level");
//!     game.setup();
//!
//!     let mut canvas = RecordingCanvas::new();
//!     let input = InputManager::new();
//!     loop {
//!         canvas.clear();
//!         game.game_loop(&mut canvas, &input);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod components;
pub mod input;
pub mod render;
pub mod scene;

mod game;

#[cfg(test)]
mod tests;

pub use game::{FrameReport, Game, GameError, GameId};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        FrameReport, Game, GameError,
        foundation::{
            math::Vec2,
            time::{Clock, SystemClock, ManualClock},
        },
        config::{Config, GameConfig},
        assets::{ImageHandle, ImageLoader, FileImageLoader},
        components::{Component, ComponentKind, Sprite, Transform},
        scene::{Node, NodeId, Scene, SceneGraph, SceneId, ParentRef},
        render::{Canvas, DrawCommand, RecordingCanvas},
        input::{Input, InputManager, KeyCode, NoInput},
    };
}
