//! Input and output buffering for the streaming state machines.

/// Growable input buffer with a read cursor.
///
/// Caller chunks are absorbed on one side while the codec consumes from
/// the other. The feed policy keeps already-buffered bytes at stable
/// positions whenever the new chunk fits the existing allocation:
///
/// 1. a drained buffer restarts at the front without reallocating;
/// 2. a chunk that fits after the unconsumed tail is appended in place;
/// 3. otherwise the tail is compacted to the front first, growing the
///    allocation only when tail plus chunk still exceed it.
pub(crate) struct InputBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
        }
    }

    /// Absorb a caller chunk behind any unconsumed bytes.
    pub(crate) fn feed(&mut self, chunk: &[u8]) {
        if self.cursor == self.data.len() {
            self.data.clear();
            self.cursor = 0;
            self.data.extend_from_slice(chunk);
            return;
        }

        if self.data.len() + chunk.len() > self.data.capacity() {
            let remaining = self.data.len() - self.cursor;
            self.data.copy_within(self.cursor.., 0);
            self.data.truncate(remaining);
            self.cursor = 0;
        }
        self.data.extend_from_slice(chunk);
    }

    /// The bytes the codec has not consumed yet.
    pub(crate) fn remaining(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// Advance the cursor past bytes the codec consumed.
    pub(crate) fn consume(&mut self, count: usize) {
        self.cursor += count;
        debug_assert!(self.cursor <= self.data.len());
        if self.cursor == self.data.len() {
            self.data.clear();
            self.cursor = 0;
        }
    }

    /// Detach the unconsumed bytes as an owned copy, leaving the buffer
    /// empty.
    pub(crate) fn take_remaining(&mut self) -> Vec<u8> {
        let tail = self.data.split_off(self.cursor);
        self.data.clear();
        self.cursor = 0;
        tail
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.data.capacity()
    }
}

/// Append-only output collector with an optional size cap.
///
/// Spare capacity for the codec grows geometrically and stops at the cap;
/// the codec is never handed a zero-length slice (callers short-circuit
/// the `Some(0)` cap before stepping).
pub(crate) struct OutputBuffer {
    data: Vec<u8>,
    written: usize,
    limit: Option<usize>,
}

impl OutputBuffer {
    const INITIAL_CAPACITY: usize = 64 * 1024;

    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            data: Vec::new(),
            written: 0,
            limit,
        }
    }

    pub(crate) fn unbounded() -> Self {
        Self::new(None)
    }

    /// Whether the cap has been reached.
    pub(crate) fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.written >= limit)
    }

    /// Writable slice for the codec, growing the allocation when the
    /// previous spare region has been used up.
    pub(crate) fn spare(&mut self) -> &mut [u8] {
        if self.written == self.data.len() && !self.is_full() {
            let doubled = if self.data.is_empty() {
                Self::INITIAL_CAPACITY
            } else {
                self.data.len().saturating_mul(2)
            };
            let target = match self.limit {
                Some(limit) => doubled.min(limit),
                None => doubled,
            };
            self.data.resize(target, 0);
        }
        &mut self.data[self.written..]
    }

    /// Record bytes the codec wrote into the spare slice.
    pub(crate) fn commit(&mut self, count: usize) {
        self.written += count;
        debug_assert!(self.written <= self.data.len());
    }

    /// The collected bytes, trimmed to what was actually written.
    pub(crate) fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.written);
        self.data
    }
}
