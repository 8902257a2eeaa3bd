//! Loop driver
//!
//! [`Game`] owns every scene of one game, a registry of named images and the
//! fixed-timestep clock state. The host calls [`Game::setup`] once and then
//! [`Game::game_loop`] once per frame tick.

use crate::{
    assets::{AssetError, ImageHandle, ImageLoader, ImageRegistry},
    config::{ConfigError, GameConfig, TimingConfig},
    foundation::time::{Clock, FrameStats},
    input::Input,
    render::Canvas,
    scene::{Scene, SceneGraph, SceneId},
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use thiserror::Error;

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

// Append-only; entries are never removed, even after the game is dropped.
static GAME_REGISTRY: Mutex<Vec<GameId>> = Mutex::new(Vec::new());

/// Process-wide identity of a constructed [`Game`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(u64);

impl GameId {
    fn register() -> Self {
        let id = Self(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed));
        GAME_REGISTRY
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
        id
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// Outcome of one [`Game::game_loop`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed updates run this frame
    pub updates: u32,
    /// Factor handed to the render pass, in `[0, 1]`
    pub interpolation: f64,
    /// Unsimulated time left after the update phase, in seconds
    pub lag: f64,
    /// No current scene, so nothing ran
    pub skipped: bool,
}

/// Loop driver errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Timestep or update cap out of range
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image loading failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Fixed-timestep game loop over a set of scenes
pub struct Game {
    id: GameId,
    clock: Box<dyn Clock>,
    graph: SceneGraph,
    current_scene: Option<SceneId>,
    images: ImageRegistry,
    config: GameConfig,
    last_time: Instant,
    lag: f64,
    stats: FrameStats,
}

impl Game {
    /// Create a game with default timing
    pub fn new(clock: impl Clock + 'static) -> Self {
        let clock: Box<dyn Clock> = Box::new(clock);
        let last_time = clock.now();
        let id = GameId::register();
        log::info!("Created {}", id);

        Self {
            id,
            clock,
            graph: SceneGraph::new(),
            current_scene: None,
            images: ImageRegistry::new(),
            config: GameConfig::default(),
            last_time,
            lag: 0.0,
            stats: FrameStats::default(),
        }
    }

    /// Create a game from a validated configuration
    pub fn with_config(
        clock: impl Clock + 'static,
        config: &GameConfig,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Self::new(clock);
        game.config = config.clone();
        Ok(game)
    }

    /// Create a game owning `scenes`; the first one becomes current
    pub fn with_scenes(
        clock: impl Clock + 'static,
        scenes: impl IntoIterator<Item = Scene>,
    ) -> Self {
        let mut game = Self::new(clock);
        for scene in scenes {
            let id = game.add_scene(scene);
            if game.current_scene.is_none() {
                game.current_scene = Some(id);
            }
        }
        game
    }

    /// Every game id constructed in this process, in construction order
    pub fn registered_instances() -> Vec<GameId> {
        GAME_REGISTRY
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// This game's registry id
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ---- scenes ----

    /// Create and register an empty scene
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        let id = self.graph.create_scene(name);
        log::info!("Created scene '{}'", self.graph.scene(id).map_or("", Scene::name));
        id
    }

    /// Register an existing scene
    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        log::info!("Added scene '{}'", scene.name());
        self.graph.add_scene(scene)
    }

    /// First scene registered under `name`
    pub fn get_scene(&self, name: &str) -> Option<SceneId> {
        self.graph.find_scene(name)
    }

    /// Make the scene named `name` current
    ///
    /// An unknown name leaves the game with no current scene.
    pub fn set_current_scene(&mut self, name: &str) {
        self.current_scene = self.get_scene(name);
        if self.current_scene.is_none() {
            log::warn!("No scene named '{}'; current scene cleared", name);
        }
    }

    /// Id of the current scene
    pub fn current_scene(&self) -> Option<SceneId> {
        self.current_scene
    }

    /// Scene and node arena
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable scene and node arena
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    // ---- images ----

    /// Queue an image for the next [`Game::load_images`]
    pub fn add_image(&mut self, name: impl Into<String>, path: impl Into<std::path::PathBuf>) {
        self.images.request(name, path);
    }

    /// Load every queued image through `loader`
    ///
    /// Failed images stay absent and the first failure is returned. Returns
    /// the number of images loaded by this call.
    pub fn load_images(&mut self, loader: &mut dyn ImageLoader) -> Result<usize, GameError> {
        Ok(self.images.load_pending(loader)?)
    }

    /// Handle of a loaded image
    pub fn get_image(&self, name: &str) -> Option<ImageHandle> {
        self.images.get(name)
    }

    /// Images waiting to be loaded
    pub fn pending_images(&self) -> usize {
        self.images.pending_count()
    }

    // ---- timing ----

    /// Seconds simulated by one update
    pub fn update_timestep(&self) -> f64 {
        self.config.timing.update_timestep
    }

    /// Change the fixed update step
    pub fn set_update_timestep(&mut self, seconds: f64) -> Result<(), GameError> {
        self.set_timing(TimingConfig {
            update_timestep: seconds,
            ..self.config.timing
        })
    }

    /// Most updates run per frame
    pub fn max_updates(&self) -> u32 {
        self.config.timing.max_updates
    }

    /// Change the per-frame update cap
    pub fn set_max_updates(&mut self, max_updates: u32) -> Result<(), GameError> {
        self.set_timing(TimingConfig {
            max_updates,
            ..self.config.timing
        })
    }

    fn set_timing(&mut self, timing: TimingConfig) -> Result<(), GameError> {
        timing
            .validate()
            .map_err(|e| GameError::InvalidTiming(e.to_string()))?;
        self.config.timing = timing;
        Ok(())
    }

    /// Unsimulated time carried into the next frame, in seconds
    pub fn lag(&self) -> f64 {
        self.lag
    }

    /// Number of [`Game::game_loop`] calls so far
    pub fn frame_count(&self) -> u64 {
        self.stats.frames
    }

    /// Frame counters
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    // ---- driver ----

    /// Reset the time baseline and run every scene's setup hook
    pub fn setup(&mut self) {
        self.last_time = self.clock.now();
        let scenes = self.graph.scene_ids().to_vec();
        log::info!("Setting up {} scene(s)", scenes.len());
        for scene in scenes {
            self.graph.setup(scene);
        }
    }

    /// Step one frame
    ///
    /// Elapsed wall time feeds the lag accumulator. The current scene then
    /// handles input, runs fixed updates while a whole timestep of lag remains
    /// (at most `max_updates` of them) and renders once with the leftover
    /// fraction of a step as interpolation.
    pub fn game_loop(&mut self, canvas: &mut dyn Canvas, input: &dyn Input) -> FrameReport {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.last_time).as_secs_f64();
        self.last_time = now;
        self.lag += elapsed;
        self.stats.frames += 1;

        let Some(scene) = self.current_scene else {
            return FrameReport {
                updates: 0,
                interpolation: 0.0,
                lag: self.lag,
                skipped: true,
            };
        };

        let TimingConfig { update_timestep, max_updates } = self.config.timing;

        self.graph.handle_input(scene, input);

        let mut updates = 0;
        while self.lag >= update_timestep && updates < max_updates {
            self.graph.update(scene);
            self.lag -= update_timestep;
            updates += 1;
        }

        self.stats.updates += u64::from(updates);
        self.stats.simulated_secs += f64::from(updates) * update_timestep;
        if self.lag >= update_timestep {
            self.stats.capped_frames += 1;
            log::debug!(
                "Update cap of {} reached; carrying {:.4}s of lag",
                max_updates,
                self.lag
            );
        }

        let interpolation = (self.lag / update_timestep).min(1.0);
        self.graph.render(scene, canvas, interpolation);

        FrameReport {
            updates,
            interpolation,
            lag: self.lag,
            skipped: false,
        }
    }

    // ---- diagnostics ----

    /// Write `Game:` and every scene's report into `out`
    pub fn write_report(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "Game:")?;
        for &scene in self.graph.scene_ids() {
            self.graph.write_scene_report(scene, out)?;
        }
        Ok(())
    }

    /// Log the report line by line at `info`
    pub fn report(&self) {
        let mut text = String::new();
        if self.write_report(&mut text).is_err() {
            return;
        }
        for line in text.lines() {
            log::info!("{}", line);
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("scenes", &self.graph.scene_ids().len())
            .field("current_scene", &self.current_scene)
            .field("lag", &self.lag)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
