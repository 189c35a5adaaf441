//! Directory-backed image store.
//!
//! Each image is `<name>.png` plus a `<name>.json` record. Images are written
//! to a `.part` file first and renamed into place, so a crashed save never
//! leaves a half-written PNG under a valid name.

use image::RgbImage;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{Dimensions, ImageMetadata, ImageRecord, ImageRef, ImageStore, StoreError, StoredImage};
use crate::decode;

const IMAGE_EXT: &str = "png";
const RECORD_EXT: &str = "json";

pub struct DirStore {
    root: PathBuf,
    counter: AtomicU64,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root).map_err(|source| StoreError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the record for `image`.
    pub fn record(&self, image: &ImageRef) -> Result<ImageRecord, StoreError> {
        let name = checked_name(image)?;
        let path = self.record_path(name);
        let data = match fs::read(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&data).map_err(|source| StoreError::Record {
            name: name.to_string(),
            source,
        })
    }

    /// All records in the store, oldest first.
    pub fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.record(&ImageRef::new(stem)) {
                Ok(rec) => records.push(rec),
                Err(e) => tracing::warn!("skipping unreadable record {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.image_name.cmp(&b.image_name))
        });
        Ok(records)
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{IMAGE_EXT}"))
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{RECORD_EXT}"))
    }

    /// 16 hex chars derived from the owning node/session, the clock and a
    /// per-store counter.
    fn next_name(&self, meta: &ImageMetadata, now_ms: u64) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(meta.node_id.as_bytes());
        hasher.update([0]);
        hasher.update(meta.session_id.as_bytes());
        hasher.update(now_ms.to_le_bytes());
        hasher.update(n.to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".part");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Place the PNG and its record under `name`. The PNG is removed again if
    /// the record cannot be written, so no image exists without a record.
    fn commit(&self, name: &str, png: &[u8], record: &[u8]) -> Result<(), StoreError> {
        let image_path = self.image_path(name);
        self.write_atomic(&image_path, png)?;
        if let Err(e) = self.write_atomic(&self.record_path(name), record) {
            if let Err(cleanup) = fs::remove_file(&image_path) {
                tracing::warn!(image = %name, "could not remove orphaned image: {cleanup}");
            }
            return Err(e);
        }
        Ok(())
    }
}

impl ImageStore for DirStore {
    fn save(&self, image: RgbImage, meta: ImageMetadata) -> Result<StoredImage, StoreError> {
        let (width, height) = image.dimensions();
        let png = decode::encode_png(&image)?;
        drop(image);

        let created_at_ms = now_ms();
        let name = self.next_name(&meta, created_at_ms);
        let record = ImageRecord {
            image_name: name.clone(),
            width,
            height,
            metadata: meta,
            created_at_ms,
        };
        let json = serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Record {
            name: name.clone(),
            source,
        })?;
        self.commit(&name, &png, &json)?;

        tracing::debug!(image = %name, width, height, bytes = png.len(), "stored image");
        Ok(StoredImage {
            image: ImageRef::new(name),
            width,
            height,
        })
    }

    fn resolve_path(&self, image: &ImageRef) -> Result<PathBuf, StoreError> {
        let name = checked_name(image)?;
        let path = self.image_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    fn describe(&self, image: &ImageRef) -> Result<Dimensions, StoreError> {
        Ok(self.record(image)?.dimensions())
    }
}

/// Names are plain file stems; anything that could escape the root is
/// treated as unknown.
fn checked_name(image: &ImageRef) -> Result<&str, StoreError> {
    let name = image.name();
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(name)
    } else {
        Err(StoreError::NotFound(name.to_string()))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
