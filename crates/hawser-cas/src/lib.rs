//! Payload chunking for oversized uploads.
//!
//! Payloads above the configured threshold are split into fixed-size parts
//! before upload. Parts are contiguous, non-overlapping slices of the
//! original payload; only the final part may be shorter.

mod chunker;

pub use chunker::{Chunk, Chunker};
