//! What a flush removed.

/// Totals of one flush, or of several accumulated with [`FlushResult::absorb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushResult {
    /// Files and symlinks unlinked.
    pub files: usize,
    /// Directories removed, the flushed folder included.
    pub dirs: usize,
    /// Bytes held by the removed files.
    pub bytes: u64,
}

impl FlushResult {
    /// True when the flush found nothing to remove.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files == 0 && self.dirs == 0
    }

    pub const fn absorb(&mut self, other: Self) {
        self.files += other.files;
        self.dirs += other.dirs;
        self.bytes += other.bytes;
    }
}
