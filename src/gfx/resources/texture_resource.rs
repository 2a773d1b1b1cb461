//! Image assets used by texture nodes
//!
//! Images are decoded once on load and then never change. They live in the scene's
//! [`ImageLibrary`] and shading graphs refer to them through [`ImageId`] handles, so
//! any number of texture nodes can share one decoded image.
//!
//! Loading the same path twice yields two independent assets; there is no cache.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TextureError;

/// Handle to an image in an [`ImageLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub(crate) usize);

/// A decoded image and where it came from
///
/// Pixel data is not serialized; renderers receiving a scene description load
/// the image again from `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    name: String,
    path: PathBuf,
    width: u32,
    height: u32,
    #[serde(skip)]
    pixels: Option<RgbaImage>,
}

impl ImageAsset {
    /// Reads and decodes an image file
    ///
    /// # Errors
    /// [`TextureError::NotFound`] when the file does not exist,
    /// [`TextureError::Decode`] when it cannot be read as an image.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        if !path.is_file() {
            return Err(TextureError::NotFound(path.to_path_buf()));
        }

        let decoded = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = decoded.to_rgba8();

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(
            "Loaded image {} ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );

        Ok(Self {
            name,
            path: path.to_path_buf(),
            width: pixels.width(),
            height: pixels.height(),
            pixels: Some(pixels),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decoded pixels; `None` for assets restored from a scene description
    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }
}

/// Scene-wide image storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageLibrary {
    images: Vec<ImageAsset>,
}

impl ImageLibrary {
    pub fn add(&mut self, asset: ImageAsset) -> ImageId {
        self.images.push(asset);
        ImageId(self.images.len() - 1)
    }

    /// Loads an image from disk and stores it
    pub fn load(&mut self, path: &Path) -> Result<ImageId, TextureError> {
        ImageAsset::load(path).map(|asset| self.add(asset))
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageAsset> {
        self.images.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageAsset> {
        self.images.iter()
    }
}
