use lode_types::ObjectId;

use crate::error::StoreResult;
use crate::object::Object;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same kind and payload always produce the same ID.
/// - Writes are idempotent: storing the same object twice returns the same
///   ID and leaves the stored bytes unchanged.
/// - Concurrent reads are always safe (objects are immutable).
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if no
    /// object exists under the ID; any other failure keeps its own variant.
    fn read(&self, id: &ObjectId) -> StoreResult<Object>;

    /// Write an object and return its content-addressed ID.
    ///
    /// The ID is computed from the object's encoded bytes. If the object
    /// already exists this is a no-op.
    fn write(&self, object: &Object) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;
}
