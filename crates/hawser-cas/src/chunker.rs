//! Fixed-size chunking.

use bytes::Bytes;

/// One part of a split payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this part in the payload, starting at 0.
    pub index: u32,
    /// Byte offset of this part within the payload.
    pub offset: u64,
    /// The part's bytes, a zero-copy slice of the payload.
    pub data: Bytes,
}

/// Splits payloads into fixed-size parts.
///
/// A payload of `n` bytes yields `ceil(n / chunk_size)` parts: every part
/// is exactly `chunk_size` bytes except the last, which holds the
/// remainder. An empty payload yields no parts.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: u32,
}

impl Chunker {
    pub fn new(chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "chunk_size must be non-zero");
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Split `data` into parts.
    ///
    /// Parts share the payload's backing buffer, so this does not copy the
    /// payload bytes.
    pub fn chunk(&self, data: &Bytes) -> Vec<Chunk> {
        if data.is_empty() {
            return Vec::new();
        }

        let chunk_size = self.chunk_size as usize;
        let mut chunks = Vec::with_capacity(data.len().div_ceil(chunk_size));
        let mut offset = 0usize;
        let mut index = 0u32;

        while offset < data.len() {
            let end = usize::min(offset + chunk_size, data.len());
            chunks.push(Chunk {
                index,
                offset: offset as u64,
                data: data.slice(offset..end),
            });
            offset = end;
            index += 1;
        }

        chunks
    }
}
