//! Texture registry
//!
//! Owns decoded textures and hands out weak generational handles to
//! them. Built on the same [`HandlePool`] the entity world uses - the
//! pool is the one allocation primitive in this engine, and anything
//! with a load/free lifecycle sits on top of it.
//!
//! Decoding is delegated entirely to the `image` crate; this module
//! only keeps the resulting RGBA8 pixels plus the tileset metadata
//! needed to address sprite cells.
//!
//! Entities store texture handles, never references: freeing a texture
//! leaves those handles dangling-but-detectable (`get` returns None),
//! and keeping a texture alive while something draws with it is the
//! caller's responsibility.

use std::collections::HashMap;
use std::path::Path;

use crate::config::EngineConfig;
use crate::pool::{Handle, HandlePool};

/// Textures held when no configuration is supplied.
pub const DEFAULT_TEXTURE_CAPACITY: u32 = 64;

/// A decoded texture: RGBA8 pixels plus tile-grid metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    /// Registry name, derived from the file stem on load
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Edge length of one sprite cell; 0 means "not a tileset"
    pub tile_size: u32,
    /// Tightly packed RGBA8, row-major, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Pixel rectangle `(x, y, w, h)` of a sprite cell, addressing the
    /// tile grid row-major. Cell indices out of range wrap within the
    /// texture like the grid does; a non-tileset (or negative cell)
    /// yields the whole texture.
    pub fn cell_rect(&self, cell: i32) -> (u32, u32, u32, u32) {
        if self.tile_size == 0 || cell < 0 {
            return (0, 0, self.width, self.height);
        }
        let cols = (self.width / self.tile_size).max(1);
        let rows = (self.height / self.tile_size).max(1);
        let cell = cell as u32 % (cols * rows);
        let x = (cell % cols) * self.tile_size;
        let y = (cell / cols) * self.tile_size;
        (x, y, self.tile_size, self.tile_size)
    }
}

/// Error type for texture loading
#[derive(Debug, Clone, PartialEq)]
pub enum TextureError {
    Io(String),
    Decode(String),
    /// The registry's pool is out of slots
    Full,
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Io(msg) => write!(f, "IO error: {}", msg),
            TextureError::Decode(msg) => write!(f, "decode error: {}", msg),
            TextureError::Full => write!(f, "texture registry is full"),
        }
    }
}

impl std::error::Error for TextureError {}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e.to_string())
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => TextureError::Io(io.to_string()),
            other => TextureError::Decode(other.to_string()),
        }
    }
}

/// A fixed-capacity registry of named textures.
pub struct TextureLibrary {
    pool: HandlePool<Texture>,
    /// Name -> handle, kept in step with the pool
    by_name: HashMap<String, Handle>,
}

impl TextureLibrary {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            pool: HandlePool::new(capacity),
            by_name: HashMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_capacity(config.texture_capacity)
    }

    /// Register an already-decoded texture. Returns [`Handle::NULL`]
    /// when the registry is full. A texture with an already-registered
    /// name replaces the old name mapping (the old texture stays alive
    /// through its handle).
    pub fn insert(&mut self, texture: Texture) -> Handle {
        let name = texture.name.clone();
        let handle = self.pool.allocate(texture);
        if !handle.is_null() && !name.is_empty() {
            self.by_name.insert(name, handle);
        }
        handle
    }

    /// Decode an image file and register it. The registry name is the
    /// file stem; `tile_size` declares the sprite-cell grid (0 for a
    /// plain texture).
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        tile_size: u32,
    ) -> Result<Handle, TextureError> {
        let path = path.as_ref();
        if self.pool.is_full() {
            return Err(TextureError::Full);
        }

        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        log::debug!("loaded texture {:?} ({}x{})", name, width, height);

        let handle = self.insert(Texture {
            name,
            width,
            height,
            tile_size,
            pixels: decoded.into_raw(),
        });
        debug_assert!(!handle.is_null());
        Ok(handle)
    }

    pub fn get(&self, handle: Handle) -> Option<&Texture> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Texture> {
        self.pool.get_mut(handle)
    }

    /// Look up a texture handle by registry name. [`Handle::NULL`] if
    /// the name is unknown.
    pub fn find(&self, name: &str) -> Handle {
        self.by_name.get(name).copied().unwrap_or(Handle::NULL)
    }

    /// Free a texture. Outstanding handles to it (including entity
    /// texture references) become stale. Returns false for handles that
    /// are already stale.
    pub fn free(&mut self, handle: Handle) -> bool {
        let name = self.pool.get(handle).map(|t| t.name.clone());
        if !self.pool.free(handle) {
            return false;
        }
        if let Some(name) = name {
            // Only drop the mapping if it still points at this handle;
            // the name may have been rebound by a later insert.
            if self.by_name.get(&name) == Some(&handle) {
                self.by_name.remove(&name);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.pool.count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Iterate over loaded textures with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Texture)> {
        self.pool.iter_with_handles()
    }
}
