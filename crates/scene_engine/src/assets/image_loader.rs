//! Image loading utilities for sprite data
//!
//! Provides PNG loading (and any other format enabled on the `image` crate) for
//! use as sprite images.

use std::path::{Path, PathBuf};
use slotmap::SlotMap;
use crate::assets::{AssetError, ImageHandle, ImageKey, ImageLoader};

/// Decoded image data
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path_ref.display(), e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image (useful for testing and placeholders)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self { data, width, height }
    }

    /// RGBA value of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// File-system image loader
///
/// Relative paths are tried against each search path in order, then as given.
/// Decoded pixels stay in the loader and are reachable through the handle.
#[derive(Debug, Default)]
pub struct FileImageLoader {
    search_paths: Vec<PathBuf>,
    images: SlotMap<ImageKey, ImageData>,
}

impl FileImageLoader {
    /// Create a loader that resolves paths as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with search paths for relative image paths
    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: paths.into_iter().map(Into::into).collect(),
            images: SlotMap::with_key(),
        }
    }

    /// Register already-decoded pixels (embedded or generated images)
    pub fn insert(&mut self, data: ImageData) -> ImageHandle {
        let (width, height) = (data.width, data.height);
        let key = self.images.insert(data);
        ImageHandle::new(key, width, height)
    }

    /// Decoded pixels for a handle
    pub fn get(&self, handle: ImageHandle) -> Option<&ImageData> {
        self.images.get(handle.key())
    }

    /// Number of decoded images held
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image has been decoded yet
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, AssetError> {
        if path.is_relative() {
            for search_path in &self.search_paths {
                let candidate = search_path.join(path);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }

        if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(AssetError::NotFound(path.display().to_string()))
        }
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&mut self, path: &Path) -> Result<ImageHandle, AssetError> {
        let file_path = self.resolve(path)?;
        let data = ImageData::from_file(&file_path)?;
        log::info!("Loaded image {}x{} from {:?}", data.width, data.height, file_path);
        Ok(self.insert(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.data.len(), 4 * 4 * 4);
        assert_eq!(img.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(4, 0), None);
    }

    #[test]
    fn test_pixel_offset_past_u32_range() {
        // claimed size larger than the buffer; the offset exceeds u32::MAX
        let img = ImageData {
            data: vec![0; 16],
            width: 70_000,
            height: 70_000,
        };
        assert_eq!(img.pixel(69_999, 69_999), None);
        assert_eq!(img.pixel(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_load_from_search_path() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "ship.png", 20, 10);

        let mut loader = FileImageLoader::with_search_paths([dir.path()]);
        let handle = loader.load(Path::new("ship.png")).unwrap();

        assert_eq!((handle.width(), handle.height()), (20, 10));
        assert_eq!(loader.get(handle).map(|d| d.data.len()), Some(20 * 10 * 4));
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = FileImageLoader::with_search_paths([dir.path()]);

        let result = loader.load(Path::new("nope.png"));

        assert!(matches!(result, Err(AssetError::NotFound(_))));
        assert!(loader.is_empty());
    }

    #[test]
    fn test_undecodable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut loader = FileImageLoader::new();
        let result = loader.load(&path);

        assert!(matches!(result, Err(AssetError::LoadFailed(_))));
    }
}
