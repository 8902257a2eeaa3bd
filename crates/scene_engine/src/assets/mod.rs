//! Asset management system
//!
//! Images are requested by name, loaded in one batch, and looked up by name
//! afterwards. Decoding is delegated to an [`ImageLoader`] so hosts can plug in
//! their own backend; [`FileImageLoader`] is the stock file-system one.

pub mod image_loader;

pub use image_loader::{FileImageLoader, ImageData};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

slotmap::new_key_type! {
    /// Key identifying a decoded image inside a loader
    pub struct ImageKey;
}

/// Opaque handle to a loaded image
///
/// Carries the natural pixel size so sprites can be laid out without going
/// back to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    key: ImageKey,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Create a handle for an image stored under `key`
    pub fn new(key: ImageKey, width: u32, height: u32) -> Self {
        Self { key, width, height }
    }

    /// Loader-side key
    pub fn key(&self) -> ImageKey {
        self.key
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Image loading backend
pub trait ImageLoader {
    /// Load the image at `path`, blocking until it is available
    fn load(&mut self, path: &Path) -> Result<ImageHandle, AssetError>;
}

/// Named image registry split into pending requests and loaded handles
#[derive(Debug, Default)]
pub struct ImageRegistry {
    pending: Vec<(String, PathBuf)>,
    loaded: HashMap<String, ImageHandle>,
}

impl ImageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a load request; a later request with the same name replaces its
    /// path but keeps its place in the queue
    pub fn request(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        let name = name.into();
        let path = path.into();
        match self.pending.iter_mut().find(|(pending, _)| *pending == name) {
            Some(entry) => entry.1 = path,
            None => self.pending.push((name, path)),
        }
    }

    /// Resolve every pending request through `loader`
    ///
    /// Every request is attempted in request order. Failed entries are dropped
    /// rather than retried, and the first failure is returned once the pending
    /// set has been cleared. Returns the number of images loaded.
    pub fn load_pending(&mut self, loader: &mut dyn ImageLoader) -> Result<usize, AssetError> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let mut loaded = 0;
        let mut first_error = None;

        for (name, path) in self.pending.drain(..) {
            match loader.load(&path) {
                Ok(handle) => {
                    log::debug!(
                        "Loaded image '{}' from {:?} ({}x{})",
                        name,
                        path,
                        handle.width(),
                        handle.height()
                    );
                    self.loaded.insert(name, handle);
                    loaded += 1;
                }
                Err(e) => {
                    log::error!("Failed to load image '{}' from {:?}: {}", name, path, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        log::info!("Loaded {} image(s)", loaded);
        match first_error {
            Some(e) => Err(e),
            None => Ok(loaded),
        }
    }

    /// Look up a loaded image
    pub fn get(&self, name: &str) -> Option<ImageHandle> {
        self.loaded.get(name).copied()
    }

    /// Number of requests waiting for [`ImageRegistry::load_pending`]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of loaded images
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
