use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::{
    assets::{bitmap::Bitmap, decode},
    foundation::error::{StyleError, StyleResult},
};

/// Shared bitmap source and content-keyed cache.
///
/// Implementations are shared across symbolizers and tiles, so every method takes `&self`.
/// Stores are insert-if-absent: once a key is cached, later stores under the same key are
/// ignored and readers keep seeing the first bitmap.
pub trait BitmapManager: Send + Sync {
    /// Load an external bitmap file. A missing or undecodable file is a [`StyleError::Asset`].
    fn load_bitmap(&self, file: &str) -> StyleResult<Arc<Bitmap>>;

    /// Look up a previously stored bitmap.
    fn get_bitmap(&self, key: &str) -> Option<Arc<Bitmap>>;

    /// Cache `bitmap` under `key` unless the key is already present.
    fn store_bitmap(&self, key: &str, bitmap: Arc<Bitmap>);
}

/// [`BitmapManager`] that resolves files relative to a root directory.
///
/// PNG/JPEG files are decoded with `image`, `.svg` files are rasterized with `resvg`.
/// Loaded files share the cache with procedural glyphs, keyed by their normalized path.
#[derive(Debug)]
pub struct FileBitmapManager {
    root: PathBuf,
    cache: RwLock<HashMap<String, Arc<Bitmap>>>,
}

impl FileBitmapManager {
    /// Create a manager rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Root directory used to resolve relative files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_and_decode(&self, norm: &str) -> StyleResult<Bitmap> {
        let path = self.root.join(norm);
        let bytes = std::fs::read(&path).map_err(|e| {
            StyleError::asset(format!("read bitmap '{}': {e}", path.display()))
        })?;
        let is_svg = Path::new(norm)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let decoded = if is_svg {
            decode::decode_svg(&bytes)
        } else {
            decode::decode_image(&bytes)
        };
        decoded.map_err(|e| StyleError::asset(format!("decode bitmap '{norm}': {e}")))
    }
}

impl BitmapManager for FileBitmapManager {
    fn load_bitmap(&self, file: &str) -> StyleResult<Arc<Bitmap>> {
        let norm = normalize_rel_path(file)
            .map_err(|e| StyleError::asset(format!("bitmap path '{file}': {e}")))?;
        if let Some(hit) = self.get_bitmap(&norm) {
            return Ok(hit);
        }

        let bitmap = Arc::new(self.read_and_decode(&norm)?);
        self.store_bitmap(&norm, bitmap);
        self.get_bitmap(&norm)
            .ok_or_else(|| StyleError::asset(format!("bitmap cache rejected '{norm}'")))
    }

    fn get_bitmap(&self, key: &str) -> Option<Arc<Bitmap>> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn store_bitmap(&self, key: &str, bitmap: Arc<Bitmap>) {
        let Ok(mut cache) = self.cache.write() else {
            tracing::warn!(key, "bitmap cache lock poisoned, skipping store");
            return;
        };
        cache.entry(key.to_owned()).or_insert(bitmap);
    }
}

/// Normalize a relative bitmap path: forward slashes, no `.`/`..` segments, no leading `/`.
pub fn normalize_rel_path(source: &str) -> StyleResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(StyleError::validation("bitmap path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(StyleError::validation("bitmap paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StyleError::validation("bitmap paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StyleError::validation("bitmap path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manager.rs"]
mod tests;
