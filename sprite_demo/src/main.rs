//! Sprite demo application
//!
//! Runs a small asteroid field headless: a steerable ship and a ring of
//! spinning rocks, driven by the fixed-timestep loop for a set number of
//! frames. Draw calls go to a recording canvas and are summarized in the log.
//!
//! Usage: `sprite_demo [config.toml|config.ron] [frames]`

use rand::Rng;
use scene_engine::assets::{AssetError, ImageData};
use scene_engine::foundation::logging;
use scene_engine::foundation::math::{constants::TAU, Vec2};
use scene_engine::prelude::*;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_FRAMES: u64 = 300;
const FRAME_SLEEP: Duration = Duration::from_millis(16);
const ASTEROID_COUNT: usize = 6;
const FIELD_RADIUS: f32 = 250.0;
const SHIP_SPEED: f32 = 3.0;
const SHIP_TURN_RATE: f32 = 0.08;
// Frames during which the scripted pilot holds the turn key
const TURN_FRAMES: u64 = 60;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Config(#[from] scene_engine::config::ConfigError),

    #[error("Invalid frame count: {0}")]
    InvalidFrames(String),
}

/// Loads images from disk, substituting a flat placeholder for missing files
struct PlaceholderLoader {
    files: FileImageLoader,
}

impl ImageLoader for PlaceholderLoader {
    fn load(&mut self, path: &Path) -> Result<ImageHandle, AssetError> {
        match self.files.load(path) {
            Err(AssetError::NotFound(missing)) => {
                log::warn!("Image {} not found, using placeholder", missing);
                Ok(self.files.insert(ImageData::solid_color(32, 32, [200, 200, 200, 255])))
            }
            result => result,
        }
    }
}

struct SpriteDemoApp {
    game: Game,
    loader: PlaceholderLoader,
    canvas: RecordingCanvas,
    input: InputManager,
}

impl SpriteDemoApp {
    fn new(config: &GameConfig) -> Result<Self, DemoError> {
        log::info!("Creating sprite demo...");
        let game = Game::with_config(SystemClock::new(), config)?;
        let loader = PlaceholderLoader {
            files: FileImageLoader::with_search_paths(config.assets.search_paths.clone()),
        };

        Ok(Self {
            game,
            loader,
            canvas: RecordingCanvas::new(),
            input: InputManager::new(),
        })
    }

    fn initialize(&mut self) -> Result<(), DemoError> {
        log::info!("Initializing sprite demo...");

        self.game.add_image("ship", "ship.png");
        self.game.add_image("asteroid", "asteroid.png");
        let loaded = self.game.load_images(&mut self.loader)?;
        log::info!("{} image(s) ready", loaded);

        let ship_image = self.game.get_image("ship");
        let asteroid_image = self.game.get_image("asteroid");

        let mut field = Scene::new("field");
        field.on_setup(move |graph: &mut SceneGraph, scene: SceneId| {
            spawn_ship(graph, scene, ship_image);
            spawn_asteroids(graph, scene, asteroid_image);
        });
        self.game.add_scene(field);
        self.game.create_scene("title");
        self.game.set_current_scene("field");

        self.game.setup();
        Ok(())
    }

    fn run(&mut self, frames: u64) {
        log::info!("Running {} frames", frames);

        for frame in 0..frames {
            // scripted pilot: turn for a while, then fly straight
            self.input.handle_key_input(KeyCode::Right, frame < TURN_FRAMES);

            self.canvas.clear();
            let report = self.game.game_loop(&mut self.canvas, &self.input);
            log::debug!(
                "frame {}: {} update(s), interpolation {:.2}, {} draw(s)",
                frame,
                report.updates,
                report.interpolation,
                self.canvas.draw_count()
            );

            if frame % 60 == 0 {
                for command in self.canvas.commands() {
                    log::trace!("  {}", command);
                }
            }

            std::thread::sleep(FRAME_SLEEP);
        }

        let stats = self.game.stats();
        log::info!(
            "{} frames, {} updates ({:.2} per frame), {} capped, {:.2}s simulated",
            stats.frames,
            stats.updates,
            stats.average_updates_per_frame(),
            stats.capped_frames,
            stats.simulated_secs
        );
        self.game.report();
    }
}

fn spawn_ship(graph: &mut SceneGraph, scene: SceneId, image: Option<ImageHandle>) {
    let Some(ship) = graph.create_game_object(scene, "ship") else {
        return;
    };
    let Some(node) = graph.node_mut(ship) else {
        return;
    };

    node.add_component(Transform::default());
    let mut sprite = Sprite::default();
    if let Some(image) = image {
        sprite.set_image(image);
    }
    sprite.set_scale(0.5, None);
    node.add_component(sprite);

    node.on_input(|node: &mut Node, input: &dyn Input| {
        let mut turn = 0.0;
        if input.is_key_down(KeyCode::Left) {
            turn -= SHIP_TURN_RATE;
        }
        if input.is_key_down(KeyCode::Right) {
            turn += SHIP_TURN_RATE;
        }
        if let Some(transform) = node.transform_mut() {
            transform.rotation = (transform.rotation + turn) % TAU;
        }
    });
    node.on_update(|node: &mut Node| {
        if let Some(transform) = node.transform_mut() {
            let heading = Vec2::new(transform.rotation.cos(), transform.rotation.sin());
            transform.position += heading * SHIP_SPEED;
        }
    });

    if let Some(flame) = graph.create_child(ship, "flame") {
        if let Some(node) = graph.node_mut(flame) {
            node.add_component(Transform::from_position(Vec2::new(-12.0, 0.0)));
        }
    }
}

fn spawn_asteroids(graph: &mut SceneGraph, scene: SceneId, image: Option<ImageHandle>) {
    let mut rng = rand::thread_rng();

    for i in 0..ASTEROID_COUNT {
        let Some(id) = graph.create_game_object(scene, format!("asteroid_{}", i)) else {
            continue;
        };
        let Some(node) = graph.node_mut(id) else {
            continue;
        };

        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(FIELD_RADIUS * 0.5..FIELD_RADIUS);
        let position = Vec2::new(angle.cos(), angle.sin()) * distance;
        node.add_component(Transform::from_position(position));

        let mut sprite = Sprite::default();
        if let Some(image) = image {
            sprite.set_image(image);
        }
        sprite.set_scale(rng.gen_range(0.5..1.5), None);
        node.add_component(sprite);

        let spin: f32 = rng.gen_range(-0.05..0.05);
        node.on_update(move |node: &mut Node| {
            if let Some(transform) = node.transform_mut() {
                transform.rotation = (transform.rotation + spin) % TAU;
            }
        });
    }
}

fn load_config(path: Option<&str>) -> Result<GameConfig, DemoError> {
    let config = match path {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str))?;

    // Initialize logging
    logging::init_with_filter(config.log_filter.as_deref().unwrap_or("info"));

    log::info!("Starting sprite demo");

    let frames = match args.get(2) {
        Some(arg) => arg
            .parse()
            .map_err(|_| DemoError::InvalidFrames(arg.clone()))?,
        None => DEFAULT_FRAMES,
    };

    let mut app = SpriteDemoApp::new(&config)?;
    app.initialize()?;
    app.run(frames);

    log::info!("Sprite demo finished");
    Ok(())
}
