//! Fixed-capacity stage buffers sitting between the caller, the engine, and
//! the sink.
//!
//! Both buffers are allocated once and reused for the owning writer's whole
//! lifetime. [`InputStage`] batches caller bytes until the engine is invoked;
//! [`OutputStage`] holds one round of engine output until it is forwarded to
//! the sink. All accesses go through checked slices; cursor invariants are
//! asserted in debug builds.

use zstd::zstd_safe::{InBuffer, OutBuffer};

/// Bytes accepted from the caller but not yet consumed by the engine.
///
/// Invariant: `len <= capacity`. Within one engine round the engine's read
/// cursor advances through `0..len`; [`InputStage::compact`] shifts the
/// unconsumed tail to the front afterwards so the cursor restarts at zero.
pub(crate) struct InputStage {
    data: Box<[u8]>,
    len: usize,
}

impl InputStage {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies as much of `src` as fits into the free tail of the buffer and
    /// returns the number of bytes taken.
    pub(crate) fn stage(&mut self, src: &[u8]) -> usize {
        let free = self.data.len() - self.len;
        let take = free.min(src.len());
        self.data[self.len..self.len + take].copy_from_slice(&src[..take]);
        self.len += take;
        take
    }

    /// Exposes the staged bytes as an engine input buffer with its cursor at
    /// the front.
    pub(crate) fn engine_input(&self) -> InBuffer<'_> {
        InBuffer::around(&self.data[..self.len])
    }

    /// Discards the first `consumed` bytes, shifting the remainder to the
    /// front of the buffer.
    pub(crate) fn compact(&mut self, consumed: usize) {
        debug_assert!(consumed <= self.len, "engine consumed beyond staged bytes");
        self.data.copy_within(consumed..self.len, 0);
        self.len -= consumed;
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }
}

/// Compressed bytes produced by the engine but not yet handed to the sink.
///
/// The engine always writes starting at offset zero, so a single `filled`
/// counter is the only cursor; forwarding resets it.
pub(crate) struct OutputStage {
    data: Box<[u8]>,
    filled: usize,
}

impl OutputStage {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Exposes the whole buffer as an engine output buffer.
    ///
    /// The previous round must have been forwarded; the engine restarts at
    /// offset zero.
    pub(crate) fn engine_output(&mut self) -> OutBuffer<'_, [u8]> {
        debug_assert_eq!(self.filled, 0, "unforwarded output would be overwritten");
        OutBuffer::around(&mut self.data[..])
    }

    /// Records how many bytes the engine produced in the last round.
    pub(crate) fn record(&mut self, produced: usize) {
        debug_assert!(produced <= self.data.len(), "engine wrote past capacity");
        self.filled = produced;
    }

    /// Returns the bytes awaiting forwarding.
    pub(crate) fn filled_slice(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    pub(crate) fn clear(&mut self) {
        self.filled = 0;
    }
}
