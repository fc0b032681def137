//! Shuffle history tracking
//!
//! Remembers which playlist positions shuffle mode has already visited so
//! picks avoid near-term repeats and "previous" can walk back through them.

/// Visited playlist indices, oldest first (most recent = back)
///
/// Entries are unique, so the history can never outgrow the playlist it
/// indexes into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleHistory {
    indices: Vec<usize>,
}

impl ShuffleHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit
    ///
    /// Returns `false` (and records nothing) if the index is already present.
    pub fn push(&mut self, index: usize) -> bool {
        if self.contains(index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Record `index` as the most recent visit
    ///
    /// An index already present moves to the back instead of repeating.
    pub fn touch(&mut self, index: usize) {
        self.indices.retain(|visited| *visited != index);
        self.indices.push(index);
    }

    /// Whether the index has been visited
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Most recent visit (without removing)
    pub fn peek(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Remove and return the most recent visit
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop()
    }

    /// Forget everything except `index`
    ///
    /// Used when every position has been visited: the cycle restarts with
    /// only the current track marked so it cannot repeat immediately.
    pub fn reset_to(&mut self, index: usize) {
        self.indices.clear();
        self.indices.push(index);
    }

    /// Rewrite every entry through `map`
    ///
    /// Used after playlist edits that move positions around.
    pub fn remap(&mut self, map: impl Fn(usize) -> usize) {
        for index in &mut self.indices {
            *index = map(*index);
        }
    }

    /// All visits, oldest first
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of visits recorded
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
