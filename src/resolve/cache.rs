//! Flat on-disk cache for game identifiers and header images.
//!
//! The cache directory holds a single `game_ids.json` object mapping the
//! lowercase-trimmed game name to its numeric identifier, plus one image
//! file per resolved game named `<safe_name>_<id>.jpg`. Identifier entries
//! are monotonic-append: once a name resolves to an id it stays resolved,
//! even if the remote service would rank its results differently today.
//!
//! The id map is persisted eagerly on every insert so a crash mid-run loses
//! nothing. An unreadable map (or a corrupt cached image) self-heals: the
//! map falls back to empty, the image is deleted and refetched.
//!
//! Concurrent runs against one cache directory are not supported; there is
//! no locking.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use regex::Regex;

const ID_CACHE_FILE: &str = "game_ids.json";

/// Lowercase-trimmed cache key for a game name.
pub fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Identifier and image cache rooted at one directory.
pub struct ImageCache {
    dir: PathBuf,
    ids: BTreeMap<String, u64>,
    strip: Regex,
    collapse: Regex,
}

impl ImageCache {
    /// Open (creating if needed) the cache directory and load the id map.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let ids = match fs::read_to_string(dir.join(ID_CACHE_FILE)) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|error| {
                log::warn!("id cache unreadable, starting fresh: {error}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Ok(ImageCache {
            dir,
            ids,
            strip: Regex::new(r"[^\w\s-]").expect("strip pattern is valid"),
            collapse: Regex::new(r"[-\s]+").expect("collapse pattern is valid"),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached identifier for a name, if any.
    pub fn cached_id(&self, name: &str) -> Option<u64> {
        self.ids.get(&cache_key(name)).copied()
    }

    /// Record an identifier and persist the map immediately.
    pub fn store_id(&mut self, name: &str, id: u64) -> io::Result<()> {
        self.ids.insert(cache_key(name), id);
        let text = serde_json::to_string_pretty(&self.ids)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        fs::write(self.dir.join(ID_CACHE_FILE), text)
    }

    /// Filesystem-safe stem for a game name: punctuation stripped, runs of
    /// spaces and hyphens collapsed to a single underscore.
    fn safe_stem(&self, name: &str) -> String {
        let stripped = self.strip.replace_all(name, "");
        self.collapse
            .replace_all(stripped.trim(), "_")
            .into_owned()
    }

    /// Deterministic on-disk path for a game's header image.
    pub fn image_path(&self, name: &str, id: u64) -> PathBuf {
        self.dir.join(format!("{}_{id}.jpg", self.safe_stem(name)))
    }

    /// Load a cached image if it exists and decodes.
    ///
    /// A file that exists but does not decode is deleted so the caller
    /// falls through to a fresh fetch.
    pub fn load_image(&self, name: &str, id: u64) -> Option<DynamicImage> {
        let path = self.image_path(name, id);
        let bytes = fs::read(&path).ok()?;
        match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                log::debug!("using cached image for {name}");
                Some(decoded)
            }
            Err(error) => {
                log::warn!(
                    "cached image corrupted for {name} ({error}), deleting {}",
                    path.display()
                );
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Persist raw fetched bytes for a game.
    pub fn store_image(&self, name: &str, id: u64, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.image_path(name, id);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([10, 20, 30]),
        ));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png)
            .expect("png encoding succeeds");
        cursor.into_inner()
    }

    #[test]
    fn stores_and_reloads_ids_across_instances() {
        let dir = tempdir().unwrap();
        {
            let mut cache = ImageCache::open(dir.path()).unwrap();
            cache.store_id("  Slay The Spire ", 646570).unwrap();
        }
        let cache = ImageCache::open(dir.path()).unwrap();
        assert_eq!(cache.cached_id("slay the spire"), Some(646570));
        assert_eq!(cache.cached_id("SLAY THE SPIRE"), Some(646570));
        assert_eq!(cache.cached_id("balatro"), None);
    }

    #[test]
    fn corrupt_id_file_falls_back_to_empty_map() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ID_CACHE_FILE), "{not json").unwrap();
        let cache = ImageCache::open(dir.path()).unwrap();
        assert_eq!(cache.cached_id("hades"), None);
    }

    #[test]
    fn safe_stem_strips_punctuation_and_collapses_separators() {
        let dir = tempdir().unwrap();
        let cache = ImageCache::open(dir.path()).unwrap();
        let path = cache.image_path("FTL: Faster - Than  Light!", 212680);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "FTL_Faster_Than_Light_212680.jpg"
        );
    }

    #[test]
    fn load_image_round_trips_stored_bytes() {
        let dir = tempdir().unwrap();
        let cache = ImageCache::open(dir.path()).unwrap();
        cache.store_image("Noita", 881100, &png_bytes(4, 3)).unwrap();

        let decoded = cache.load_image("Noita", 881100).expect("decodable image");
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn corrupt_cached_image_is_deleted_on_probe() {
        let dir = tempdir().unwrap();
        let cache = ImageCache::open(dir.path()).unwrap();
        let path = cache.store_image("Noita", 881100, b"not an image").unwrap();

        assert!(cache.load_image("Noita", 881100).is_none());
        assert!(!path.exists(), "corrupt file should be removed");
    }

    #[test]
    fn missing_image_is_a_clean_miss() {
        let dir = tempdir().unwrap();
        let cache = ImageCache::open(dir.path()).unwrap();
        assert!(cache.load_image("Celeste", 504230).is_none());
    }
}
