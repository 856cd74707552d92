use lode_types::ObjectId;

use crate::encoding;
use crate::error::{StoreError, StoreResult};

/// Number of raw identifier bytes trailing each tree record.
const ENTRY_ID_LEN: usize = 20;

/// The kind of object stored.
///
/// The enumeration is closed: `Commit` and `Tag` are recognized header
/// tokens so unknown-object probes stay recoverable, but only `Blob` and
/// `Tree` have variant implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: ordered entries mapping names to object references.
    Tree,
    /// Recognized header token, no variant implementation.
    Commit,
    /// Recognized header token, no variant implementation.
    Tag,
}

impl ObjectKind {
    /// The ASCII token that leads this kind's encoded header.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// Parse a header token.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token {
            b"blob" => Some(Self::Blob),
            b"tree" => Some(Self::Tree),
            b"commit" => Some(Self::Commit),
            b"tag" => Some(Self::Tag),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
///
/// A blob is defined purely by its byte content: serialization is the
/// identity function and deserialization stores the bytes verbatim. The
/// payload is immutable after construction and the identifier is computed
/// eagerly from the encoded form, so the two can never diverge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
    id: ObjectId,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        let id = ObjectId::from_bytes(&encoding::encode(ObjectKind::Blob, &data));
        Self { data, id }
    }

    /// The blob's payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the blob, yielding its payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The content-addressed identifier (hash of the encoded bytes, not the
    /// raw payload).
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
}

impl EntryMode {
    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Directory),
            _ => None,
        }
    }

    /// Parse the ASCII mode token of a tree record.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        let s = std::str::from_utf8(token).ok()?;
        let bits = u32::from_str_radix(s, 8).ok()?;
        Self::from_mode_bits(bits)
    }

    /// The mode token as written inside a tree record. Leading zeros are
    /// dropped: directories serialize as `40000`.
    pub fn wire_token(&self) -> String {
        format!("{:o}", self.mode_bits())
    }

    /// The object kind this mode points at.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree object.
///
/// All three record fields survive parsing: the decoded mode, the name, and
/// the child identifier (stored as 20 raw bytes on disk, surfaced here as an
/// [`ObjectId`] and hex-encoded at presentation boundaries).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory).
    pub mode: EntryMode,
    /// Entry name. Never contains a NUL byte.
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            id,
        }
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Presentation mode for rendering a tree. Open enumeration: new modes are
/// additional arms, parse logic is untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeFormat {
    /// One entry name per line.
    NameOnly,
    /// `<mode> <kind> <id>\t<name>` per line.
    Long,
}

/// Directory listing object.
///
/// Holds the first level of entries only; children are not resolved into
/// objects. Entry order is preserved exactly as parsed, and the identifier
/// is computed eagerly from the encoded payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
    id: ObjectId,
}

impl Tree {
    /// Create a new tree with the given entries.
    ///
    /// Entries are sorted by name for deterministic hashing.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        let mut tree = Self {
            entries,
            id: ObjectId::null(),
        };
        tree.id = ObjectId::from_bytes(&encoding::encode(ObjectKind::Tree, &tree.to_payload()));
        tree
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a tree payload: repeated `<mode> <name>\0<20-byte-id>` records.
    ///
    /// Entry order is preserved from the payload. Every delimiter search and
    /// the fixed-width identifier read are bounds-checked; a missing space or
    /// NUL, a truncated identifier, or an unrecognized mode aborts with
    /// [`StoreError::MalformedTreeEntry`] rather than reading past the buffer.
    pub fn parse(payload: &[u8]) -> StoreResult<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;
        while pos < payload.len() {
            let rest = &payload[pos..];
            let space = rest.iter().position(|&b| b == b' ').ok_or_else(|| {
                StoreError::MalformedTreeEntry {
                    offset: pos,
                    reason: "no space after mode token".into(),
                }
            })?;
            let mode = EntryMode::from_token(&rest[..space]).ok_or_else(|| {
                StoreError::MalformedTreeEntry {
                    offset: pos,
                    reason: format!(
                        "unrecognized mode token {:?}",
                        String::from_utf8_lossy(&rest[..space])
                    ),
                }
            })?;

            let name_start = space + 1;
            let nul = rest[name_start..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| name_start + i)
                .ok_or_else(|| StoreError::MalformedTreeEntry {
                    offset: pos,
                    reason: "no NUL after entry name".into(),
                })?;
            let name = std::str::from_utf8(&rest[name_start..nul])
                .map_err(|_| StoreError::MalformedTreeEntry {
                    offset: pos,
                    reason: "entry name is not valid UTF-8".into(),
                })?
                .to_owned();

            let id_start = nul + 1;
            let id_end = id_start + ENTRY_ID_LEN;
            if rest.len() < id_end {
                return Err(StoreError::MalformedTreeEntry {
                    offset: pos,
                    reason: format!(
                        "truncated object id: need {ENTRY_ID_LEN} bytes, have {}",
                        rest.len() - id_start
                    ),
                });
            }
            let mut raw = [0u8; ENTRY_ID_LEN];
            raw.copy_from_slice(&rest[id_start..id_end]);

            entries.push(TreeEntry {
                mode,
                name,
                id: ObjectId::from_hash(raw),
            });
            pos += id_end;
        }

        // Hash the payload as given, byte-exact with what is on disk.
        let id = ObjectId::from_bytes(&encoding::encode(ObjectKind::Tree, payload));
        Ok(Self { entries, id })
    }

    /// Serialize back to the binary record grammar. Lossless: all record
    /// fields are retained by [`Tree::parse`].
    pub fn to_payload(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for entry in &self.entries {
            buf.extend_from_slice(entry.mode.wire_token().as_bytes());
            buf.push(b' ');
            buf.extend_from_slice(entry.name.as_bytes());
            buf.push(0);
            buf.extend_from_slice(entry.id.as_bytes());
        }
        buf
    }

    /// Render the tree for presentation.
    pub fn format(&self, format: TreeFormat) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match format {
                TreeFormat::NameOnly => {
                    out.push_str(&entry.name);
                    out.push('\n');
                }
                TreeFormat::Long => {
                    out.push_str(&format!(
                        "{} {} {}\t{}\n",
                        entry.mode,
                        entry.mode.kind(),
                        entry.id,
                        entry.name
                    ));
                }
            }
        }
        out
    }

    /// The entries in this tree, in stored order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The content-addressed identifier (hash of the encoded bytes).
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// A typed, immutable stored object.
///
/// The sum type over the constructible variants. Every dispatch site matches
/// exhaustively; adding commit or tag support later is a new variant plus
/// new match arms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
}

impl Object {
    /// The kind tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
        }
    }

    /// The serialized payload (the bytes between header and end of file).
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Blob(blob) => blob.data().to_vec(),
            Self::Tree(tree) => tree.to_payload(),
        }
    }

    /// The canonical encoded form: `<type> <size>\0<payload>`.
    pub fn encode(&self) -> Vec<u8> {
        encoding::encode(self.kind(), &self.payload())
    }

    /// The content-addressed identifier.
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Blob(blob) => blob.id(),
            Self::Tree(tree) => tree.id(),
        }
    }

    /// Borrow the blob variant, if this is one.
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Self::Blob(blob) => Some(blob),
            Self::Tree(_) => None,
        }
    }

    /// Borrow the tree variant, if this is one.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Blob(_) => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: EntryMode, name: &str, seed: &[u8]) -> TreeEntry {
        TreeEntry::new(mode, name, ObjectId::from_bytes(seed))
    }

    // -----------------------------------------------------------------------
    // Kinds and tokens
    // -----------------------------------------------------------------------

    #[test]
    fn kind_token_roundtrip() {
        for kind in [
            ObjectKind::Blob,
            ObjectKind::Tree,
            ObjectKind::Commit,
            ObjectKind::Tag,
        ] {
            assert_eq!(ObjectKind::from_token(kind.token().as_bytes()), Some(kind));
        }
    }

    #[test]
    fn unknown_token_is_none() {
        assert_eq!(ObjectKind::from_token(b"blobby"), None);
        assert_eq!(ObjectKind::from_token(b""), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", ObjectKind::Blob), "blob");
        assert_eq!(format!("{}", ObjectKind::Tree), "tree");
        assert_eq!(format!("{}", ObjectKind::Commit), "commit");
        assert_eq!(format!("{}", ObjectKind::Tag), "tag");
    }

    // -----------------------------------------------------------------------
    // Blob
    // -----------------------------------------------------------------------

    #[test]
    fn blob_holds_payload_verbatim() {
        let blob = Blob::new(b"hello world".to_vec());
        assert_eq!(blob.data(), b"hello world");
    }

    #[test]
    fn blob_id_matches_git() {
        // Well-known git hashes pin the identity scheme: SHA-1 over the
        // encoded bytes, not the raw payload.
        let empty = Blob::new(Vec::new());
        assert_eq!(empty.id().to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");

        let hello = Blob::new(b"hello world\n".to_vec());
        assert_eq!(hello.id().to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    }

    #[test]
    fn same_payload_same_id() {
        let a = Blob::new(b"dup".to_vec());
        let b = Blob::new(b"dup".to_vec());
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Entry modes
    // -----------------------------------------------------------------------

    #[test]
    fn entry_mode_bits_roundtrip() {
        for mode in [
            EntryMode::Regular,
            EntryMode::Executable,
            EntryMode::Symlink,
            EntryMode::Directory,
        ] {
            let bits = mode.mode_bits();
            assert_eq!(EntryMode::from_mode_bits(bits), Some(mode));
        }
    }

    #[test]
    fn entry_mode_unknown_bits() {
        assert!(EntryMode::from_mode_bits(0o777).is_none());
    }

    #[test]
    fn entry_mode_wire_tokens() {
        assert_eq!(EntryMode::Regular.wire_token(), "100644");
        // Directory drops the leading zero on the wire.
        assert_eq!(EntryMode::Directory.wire_token(), "40000");
        // But displays with it.
        assert_eq!(format!("{}", EntryMode::Directory), "040000");
    }

    #[test]
    fn entry_mode_token_accepts_leading_zero() {
        assert_eq!(EntryMode::from_token(b"040000"), Some(EntryMode::Directory));
        assert_eq!(EntryMode::from_token(b"40000"), Some(EntryMode::Directory));
    }

    #[test]
    fn entry_mode_kind() {
        assert_eq!(EntryMode::Directory.kind(), ObjectKind::Tree);
        assert_eq!(EntryMode::Regular.kind(), ObjectKind::Blob);
        assert_eq!(EntryMode::Symlink.kind(), ObjectKind::Blob);
    }

    // -----------------------------------------------------------------------
    // Tree grammar
    // -----------------------------------------------------------------------

    fn raw_record(mode: &str, name: &str, id: &[u8; 20]) -> Vec<u8> {
        let mut rec = Vec::new();
        rec.extend_from_slice(mode.as_bytes());
        rec.push(b' ');
        rec.extend_from_slice(name.as_bytes());
        rec.push(0);
        rec.extend_from_slice(id);
        rec
    }

    #[test]
    fn parse_two_records_in_order() {
        let mut payload = raw_record("100644", "name1", &[0xaa; 20]);
        payload.extend(raw_record("40000", "name2", &[0xbb; 20]));

        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.entries()[0].name, "name1");
        assert_eq!(tree.entries()[0].mode, EntryMode::Regular);
        assert_eq!(tree.entries()[0].id, ObjectId::from_hash([0xaa; 20]));
        assert_eq!(tree.entries()[1].name, "name2");
        assert_eq!(tree.entries()[1].mode, EntryMode::Directory);
    }

    #[test]
    fn parse_preserves_unsorted_order() {
        let mut payload = raw_record("100644", "zebra", &[1; 20]);
        payload.extend(raw_record("100644", "alpha", &[2; 20]));

        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.entries()[0].name, "zebra");
        assert_eq!(tree.entries()[1].name, "alpha");
    }

    #[test]
    fn parse_empty_payload_is_empty_tree() {
        let tree = Tree::parse(b"").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn parse_missing_space_fails() {
        let err = Tree::parse(b"100644").unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedTreeEntry { offset: 0, .. }
        ));
    }

    #[test]
    fn parse_missing_nul_fails() {
        let err = Tree::parse(b"100644 name-without-nul").unwrap_err();
        assert!(matches!(err, StoreError::MalformedTreeEntry { .. }));
    }

    #[test]
    fn parse_truncated_id_fails() {
        let mut payload = b"100644 file\0".to_vec();
        payload.extend_from_slice(&[0xcc; 7]); // 7 of 20 bytes
        let err = Tree::parse(&payload).unwrap_err();
        assert!(matches!(err, StoreError::MalformedTreeEntry { .. }));
    }

    #[test]
    fn parse_bad_mode_fails() {
        let payload = raw_record("999999", "file", &[0; 20]);
        let err = Tree::parse(&payload).unwrap_err();
        assert!(matches!(err, StoreError::MalformedTreeEntry { .. }));
    }

    #[test]
    fn parse_reports_offset_of_bad_record() {
        let mut payload = raw_record("100644", "good", &[1; 20]);
        let first_len = payload.len();
        payload.extend_from_slice(b"100644 truncated\0");
        let err = Tree::parse(&payload).unwrap_err();
        match err {
            StoreError::MalformedTreeEntry { offset, .. } => assert_eq!(offset, first_len),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn payload_roundtrip() {
        let mut payload = raw_record("100644", "a.txt", &[3; 20]);
        payload.extend(raw_record("40000", "dir", &[4; 20]));
        payload.extend(raw_record("120000", "link", &[5; 20]));

        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.to_payload(), payload);
    }

    // -----------------------------------------------------------------------
    // Tree construction and rendering
    // -----------------------------------------------------------------------

    #[test]
    fn new_sorts_entries() {
        let tree = Tree::new(vec![
            entry(EntryMode::Regular, "zebra.txt", b"z"),
            entry(EntryMode::Regular, "alpha.txt", b"a"),
            entry(EntryMode::Directory, "middle", b"m"),
        ]);
        assert_eq!(tree.entries()[0].name, "alpha.txt");
        assert_eq!(tree.entries()[1].name, "middle");
        assert_eq!(tree.entries()[2].name, "zebra.txt");
    }

    #[test]
    fn empty_tree_id_matches_git() {
        assert_eq!(
            Tree::empty().id().to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn parse_and_new_agree_on_sorted_input() {
        let entries = vec![
            entry(EntryMode::Regular, "a.txt", b"a"),
            entry(EntryMode::Directory, "sub", b"s"),
        ];
        let built = Tree::new(entries);
        let parsed = Tree::parse(&built.to_payload()).unwrap();
        assert_eq!(built, parsed);
        assert_eq!(built.id(), parsed.id());
    }

    #[test]
    fn format_name_only() {
        let mut payload = raw_record("100644", "name1", &[1; 20]);
        payload.extend(raw_record("100644", "name2", &[2; 20]));
        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.format(TreeFormat::NameOnly), "name1\nname2\n");
    }

    #[test]
    fn format_long() {
        let id = [0xabu8; 20];
        let payload = raw_record("40000", "dir", &id);
        let tree = Tree::parse(&payload).unwrap();
        let expected = format!("040000 tree {}\tdir\n", hex::encode(id));
        assert_eq!(tree.format(TreeFormat::Long), expected);
    }

    #[test]
    fn tree_get_entry() {
        let tree = Tree::new(vec![
            entry(EntryMode::Regular, "a.txt", b"a"),
            entry(EntryMode::Regular, "b.txt", b"b"),
        ]);
        assert!(tree.get("a.txt").is_some());
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Object sum type
    // -----------------------------------------------------------------------

    #[test]
    fn object_dispatch() {
        let blob: Object = Blob::new(b"x".to_vec()).into();
        assert_eq!(blob.kind(), ObjectKind::Blob);
        assert!(blob.as_blob().is_some());
        assert!(blob.as_tree().is_none());

        let tree: Object = Tree::empty().into();
        assert_eq!(tree.kind(), ObjectKind::Tree);
        assert!(tree.as_tree().is_some());
        assert!(tree.as_blob().is_none());
    }

    #[test]
    fn object_id_agrees_with_variant() {
        let blob = Blob::new(b"payload".to_vec());
        let id = blob.id();
        let object: Object = blob.into();
        assert_eq!(object.id(), id);
        assert_eq!(object.id(), ObjectId::from_bytes(&object.encode()));
    }
}
