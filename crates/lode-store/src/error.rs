use lode_types::{ObjectId, TypeError};

/// Errors from object store operations.
///
/// Every variant is recoverable. The core never terminates the process;
/// exit-code policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier is not a 40-character hex string. Raised before any
    /// filesystem access so malformed input can never shape a storage path.
    #[error("invalid object identifier: {0}")]
    InvalidIdentifier(#[from] TypeError),

    /// No object exists at the path derived from the identifier.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// Filesystem failure other than not-found.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed stream could not be decompressed.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    /// The object header is missing a delimiter.
    #[error("malformed object header: {0}")]
    MalformedHeader(String),

    /// The size field is not a decimal integer or disagrees with the payload.
    #[error("malformed object size: {0}")]
    MalformedSize(String),

    /// A tree record is missing a delimiter or truncated.
    #[error("malformed tree entry at byte {offset}: {reason}")]
    MalformedTreeEntry { offset: usize, reason: String },

    /// A recognized-but-unimplemented or unknown type token.
    #[error("unsupported object type: {0:?}")]
    UnsupportedType(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
