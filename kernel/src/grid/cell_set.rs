//! Dense bitset of grid cells, keyed by row-major cell index.
//!
//! Used for the per-branch visited set. A branch clones the set once per
//! expansion and shares the copy (behind an `Arc`) with all of its children,
//! so the cost per branch is one `O(cells / 64)` copy.

/// Bitset over row-major cell indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSetV1 {
    words: Vec<u64>,
    len: usize,
}

impl CellSetV1 {
    /// Create an empty set sized for `cell_count` cells.
    #[must_use]
    pub fn with_capacity(cell_count: usize) -> Self {
        Self {
            words: vec![0; cell_count.div_ceil(64)],
            len: 0,
        }
    }

    /// Insert a cell index. Returns `false` if it was already present.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / 64, index % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        if self.words[word] & mask != 0 {
            return false;
        }
        self.words[word] |= mask;
        self.len += 1;
        true
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|word| word & (1u64 << (index % 64)) != 0)
    }

    /// Number of cells in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
