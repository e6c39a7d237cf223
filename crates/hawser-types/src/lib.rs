//! Core types shared across the hawser crates.
//!
//! - [`ContentId`]: opaque identifier assigned to uploaded content by the
//!   pinning network. Treated as a string token; never parsed or derived
//!   locally.
//! - [`PinScope`]: whether a pin is tracked for the local node or the remote
//!   pinning service.
//! - [`PinRecord`]: durable record of the latest confirmed pin state.
//! - [`UploadReceipt`]: result of an upload, covering both direct and
//!   chunked payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Content identifiers
// ---------------------------------------------------------------------------

/// Identifier assigned to uploaded content by the pinning network.
///
/// The network derives identifiers from content; two uploads of the same
/// bytes yield the same identifier. Locally this is an opaque token: it is
/// carried, compared, and used as a key, never inspected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Pin state
// ---------------------------------------------------------------------------

/// Scope a pin is tracked under.
///
/// The scope is part of the registry key, so the same content can be pinned
/// locally and remotely at the same time without the records colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinScope {
    /// Pinned for this node.
    Local,
    /// Pinned on the remote pinning service.
    Remote,
}

impl PinScope {
    /// Stable string form, used as the registry key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            PinScope::Local => "local",
            PinScope::Remote => "remote",
        }
    }
}

impl fmt::Display for PinScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest confirmed pin state for one content identifier in one scope.
///
/// Records are never deleted: unpinning flips `pinned` to `false` and the
/// record stays behind as history of the content having been managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRecord {
    pub content_id: ContentId,
    pub scope: PinScope,
    pub pinned: bool,
    /// Unix timestamp (seconds) of the last state change.
    pub updated_at: u64,
}

// ---------------------------------------------------------------------------
// Upload results
// ---------------------------------------------------------------------------

/// Result of uploading one payload.
///
/// For a direct upload `part_ids` holds the single identifier and
/// `content_id` equals it. For a chunked upload `part_ids` holds every part
/// identifier in payload order and `content_id` is the first part, which
/// callers that only track one identifier per upload can keep using.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Representative identifier for the upload.
    pub content_id: ContentId,
    /// Size of the whole logical payload in bytes, not of any single part.
    pub size_bytes: u64,
    /// Identifier of every uploaded part, in payload order.
    pub part_ids: Vec<ContentId>,
}

impl UploadReceipt {
    /// Receipt for a payload that was uploaded in one piece.
    pub fn single(content_id: ContentId, size_bytes: u64) -> Self {
        Self {
            content_id: content_id.clone(),
            size_bytes,
            part_ids: vec![content_id],
        }
    }

    /// Whether the payload was split into multiple parts.
    pub fn is_chunked(&self) -> bool {
        self.part_ids.len() > 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
