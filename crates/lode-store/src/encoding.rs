//! Canonical object encoding: `<type> <size>\0<payload>`.
//!
//! The encoded form is both the on-disk layout (after compression) and the
//! exact input to hashing, so an object's identity is a function of its kind
//! and payload together. The encoding is injective: the NUL delimiter cannot
//! appear in the decimal size field and the size field is self-describing.

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, Object, ObjectKind, Tree};

/// Encode a payload under the given kind's header.
pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind.token(), payload.len());
    let mut buf = Vec::with_capacity(header.len() + payload.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode an encoded object into its typed variant.
///
/// All-or-nothing: on any error no partially decoded object escapes.
/// Unknown or unimplemented type tokens are a recoverable
/// [`StoreError::UnsupportedType`], never a panic, since callers may probe
/// object kinds they do not handle.
pub fn decode(bytes: &[u8]) -> StoreResult<Object> {
    let space = bytes
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| StoreError::MalformedHeader("no space after type token".into()))?;
    let token = &bytes[..space];

    let size_start = space + 1;
    let nul = bytes[size_start..]
        .iter()
        .position(|&b| b == 0)
        .map(|i| size_start + i)
        .ok_or_else(|| StoreError::MalformedHeader("no NUL after size field".into()))?;

    let size_field = &bytes[size_start..nul];
    let size: usize = std::str::from_utf8(size_field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            StoreError::MalformedSize(format!(
                "not a decimal integer: {:?}",
                String::from_utf8_lossy(size_field)
            ))
        })?;

    let payload = &bytes[nul + 1..];
    if payload.len() != size {
        return Err(StoreError::MalformedSize(format!(
            "header declares {size} bytes, payload has {}",
            payload.len()
        )));
    }

    match ObjectKind::from_token(token) {
        Some(ObjectKind::Blob) => Ok(Object::Blob(Blob::new(payload.to_vec()))),
        Some(ObjectKind::Tree) => Ok(Object::Tree(Tree::parse(payload)?)),
        Some(kind) => Err(StoreError::UnsupportedType(kind.token().to_owned())),
        None => Err(StoreError::UnsupportedType(
            String::from_utf8_lossy(token).into_owned(),
        )),
    }
}
