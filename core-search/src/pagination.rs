//! Pagination window for incremental search fetches

/// Pagination parameters for one search session
///
/// `offset` grows by `base_offset` whenever a fetched batch is nearly full
/// (size ≥ `base_offset - 1`), the signal that more results may exist
/// upstream. `base_offset` is fixed at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Maximum batch size per fetch
    pub limit: u32,
    /// Current offset into the upstream result set; doubles as the display
    /// window length
    pub offset: u32,
    base_offset: u32,
}

impl PagingConfig {
    /// Create a config; the initial `offset` becomes the fixed `base_offset`.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            base_offset: offset,
        }
    }

    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    /// Whether a batch of `batch_len` items signals more results upstream.
    pub fn should_advance(&self, batch_len: usize) -> bool {
        batch_len as u64 + 1 >= self.base_offset as u64
    }

    /// Grow the window by one base step.
    pub fn advance(&mut self) {
        self.offset += self.base_offset;
    }

    /// Reset the window for a fresh search session.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(25, 25)
    }
}
