use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use lode_types::ObjectId;

use crate::codec;
use crate::encoding;
use crate::error::{StoreError, StoreResult};
use crate::object::Object;
use crate::traits::ObjectStore;

/// Loose object store: one zlib-compressed file per object under a
/// hash-derived path.
///
/// An object with hex identifier `aabb...` lives at `<root>/aa/bb...`
/// (2-character directory, 38-character filename). The identifier shape is
/// enforced by [`ObjectId`] before a path is ever derived, so
/// path-traversal-shaped inputs cannot reach the filesystem.
///
/// Writes go through a temporary file and an atomic rename; a reader never
/// observes a partially written object. There is no caching layer: every
/// read decompresses from disk, every write recompresses and rehashes.
pub struct LooseObjectStore {
    root: PathBuf,
}

impl LooseObjectStore {
    /// Create a store rooted at the given object directory.
    ///
    /// The directory itself is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The object root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path an object with this ID is stored at.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    /// Read an object by its 40-character hex identifier.
    ///
    /// The identifier shape is validated before any filesystem access;
    /// anything other than 40 hex characters is
    /// [`StoreError::InvalidIdentifier`].
    pub fn read_hex(&self, hex: &str) -> StoreResult<Object> {
        let id = ObjectId::from_hex(hex)?;
        self.read(&id)
    }
}

impl ObjectStore for LooseObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Object> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id));
            }
            Err(e) => return Err(e.into()),
        };

        let raw = codec::decompress(&compressed).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: e.to_string(),
        })?;

        let object = encoding::decode(&raw)?;
        debug!(id = %id, size = raw.len(), "read loose object");
        Ok(object)
    }

    fn write(&self, object: &Object) -> StoreResult<ObjectId> {
        let id = object.id();
        if self.exists(&id)? {
            // Content-addressing: an existing object under this ID already
            // holds byte-identical content.
            debug!(id = %id, "loose object already present");
            return Ok(id);
        }

        let hex = id.to_hex();
        let dir = self.root.join(&hex[..2]);
        // Tolerates concurrent creation: "already exists" is success.
        fs::create_dir_all(&dir)?;

        let compressed = codec::compress(&object.encode())?;

        // Stage next to the final location, then rename into place so no
        // reader can observe a partial object.
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&compressed)?;
        tmp.persist(dir.join(&hex[2..]))
            .map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id, bytes = compressed.len(), "wrote loose object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        match fs::metadata(self.object_path(id)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for LooseObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LooseObjectStore")
            .field("root", &self.root)
            .finish()
    }
}
