//! Playlist sequencing
//!
//! Owns the playlist and decides which position plays next or previous,
//! sequentially or shuffled. Shuffle mode draws from the positions not yet
//! visited (see [`ShuffleHistory`]) so nothing repeats until every track
//! has had its turn.

use crate::error::{PlayerError, Result};
use crate::history::ShuffleHistory;
use crate::types::AddedRange;
use cadence_core::Track;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Where `index` ends up after moving the item at `from` to `to`
///
/// Standard remove-then-insert splice: the moved item lands on `to`, items
/// between the two positions shift by one toward the gap, the rest stay.
pub fn moved_index(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < to && index > from && index <= to {
        index - 1
    } else if from > to && index >= to && index < from {
        index + 1
    } else {
        index
    }
}

/// Playlist plus the position pointer and shuffle state
pub struct Sequencer {
    tracks: Vec<Track>,
    current: Option<usize>,
    shuffle: bool,
    history: ShuffleHistory,

    // Shuffle pick handed out by `peek_next`, honoured by the next
    // `compute_next` while it is still a valid candidate
    reserved: Option<usize>,

    rng: StdRng,
}

/// Snapshot of the mutable sequencing state
///
/// Taken before a transition so a failed one can be rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerCheckpoint {
    current: Option<usize>,
    history: ShuffleHistory,
    reserved: Option<usize>,
}

impl Sequencer {
    /// Create an empty sequencer seeded from OS entropy
    pub fn new(shuffle: bool) -> Self {
        Self::with_rng(shuffle, StdRng::from_entropy())
    }

    /// Create an empty sequencer with a fixed shuffle seed
    pub fn with_seed(shuffle: bool, seed: u64) -> Self {
        Self::with_rng(shuffle, StdRng::seed_from_u64(seed))
    }

    /// Switch to a fixed shuffle seed, keeping the playlist and position
    ///
    /// A pending reserved pick came from the old generator and is dropped.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.reserved = None;
    }

    fn with_rng(shuffle: bool, rng: StdRng) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            shuffle,
            history: ShuffleHistory::new(),
            reserved: None,
            rng,
        }
    }

    // ===== Navigation =====

    /// Resolve the position that plays after the current one
    ///
    /// Shuffle mode records the pick in the history before returning it.
    pub fn compute_next(&mut self) -> Result<usize> {
        let len = self.ensure_not_empty()?;

        if !self.shuffle {
            return Ok(self.sequential_next(len));
        }

        if len == 1 {
            self.reserved = None;
            self.history.push(0);
            return Ok(0);
        }

        let (candidates, exhausted) = self.shuffle_candidates();
        let pick = match self.reserved.take() {
            Some(index) if candidates.contains(&index) => index,
            _ => *candidates
                .choose(&mut self.rng)
                .ok_or(PlayerError::EmptyPlaylist)?,
        };

        if exhausted {
            // Every position visited: start a new cycle that still keeps
            // the current track from repeating immediately
            match self.current {
                Some(current) => self.history.reset_to(current),
                None => self.history.clear(),
            }
        }
        self.history.push(pick);

        Ok(pick)
    }

    /// Resolve the position that plays before the current one
    ///
    /// In shuffle mode this walks back through the actual picks rather than
    /// drawing a new one.
    pub fn compute_previous(&mut self) -> Result<usize> {
        let len = self.ensure_not_empty()?;

        if self.shuffle && self.history.len() > 1 {
            // Drop the entry for the current track, land on the one before
            self.history.pop();
            if let Some(index) = self.history.peek() {
                return Ok(index);
            }
        }

        Ok(self.current.map_or(len - 1, |current| (current + len - 1) % len))
    }

    /// Which position `compute_next` would return, without touching history
    ///
    /// A shuffle draw made here is reserved, so what gets preloaded is what
    /// plays.
    pub fn peek_next(&mut self) -> Result<usize> {
        let len = self.ensure_not_empty()?;

        if !self.shuffle {
            return Ok(self.sequential_next(len));
        }
        if len == 1 {
            return Ok(0);
        }

        let (candidates, _) = self.shuffle_candidates();
        if let Some(index) = self.reserved.filter(|index| candidates.contains(index)) {
            return Ok(index);
        }

        let pick = *candidates
            .choose(&mut self.rng)
            .ok_or(PlayerError::EmptyPlaylist)?;
        self.reserved = Some(pick);
        Ok(pick)
    }

    /// Flip shuffle mode
    ///
    /// History is cleared either way. Turning shuffle on returns a random
    /// position other than the current one for the caller to jump to.
    pub fn toggle_shuffle(&mut self) -> Option<usize> {
        self.shuffle = !self.shuffle;
        self.history.clear();
        self.reserved = None;

        if !self.shuffle {
            return None;
        }

        let current = self.current;
        let candidates: Vec<usize> = (0..self.tracks.len())
            .filter(|index| Some(*index) != current)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Mark `index` as the track now playing
    pub fn on_track_loaded(&mut self, index: usize) -> Result<()> {
        let len = self.tracks.len();
        if index >= len {
            return Err(PlayerError::invalid_index(index, len));
        }

        self.current = Some(index);
        if self.shuffle {
            // Keeps the current track on top even after a manual pick of
            // an already-visited position
            self.history.touch(index);
        }
        Ok(())
    }

    // ===== Playlist Editing =====

    /// Append a track, returning its position
    pub fn add_track(&mut self, track: Track) -> Result<usize> {
        track.validate()?;
        self.tracks.push(track);
        Ok(self.tracks.len() - 1)
    }

    /// Add several tracks at once
    ///
    /// Either all tracks are valid and added, or none are. With
    /// `insert_after_current` (and something current) they go right after
    /// the current track, otherwise at the end.
    pub fn add_tracks(
        &mut self,
        tracks: Vec<Track>,
        insert_after_current: bool,
    ) -> Result<AddedRange> {
        for track in &tracks {
            track.validate()?;
        }

        let count = tracks.len();
        let start = match (insert_after_current, self.current) {
            (true, Some(current)) => current + 1,
            _ => self.tracks.len(),
        };

        self.tracks.splice(start..start, tracks);

        let shift = move |index: usize| if index >= start { index + count } else { index };
        self.current = self.current.map(shift);
        self.history.remap(shift);
        self.reserved = self.reserved.map(shift);

        Ok(AddedRange { start, count })
    }

    /// Move a track (drag-reorder)
    ///
    /// Every stored position follows the move, so the current track stays
    /// current wherever it lands.
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tracks.len();
        if from >= len {
            return Err(PlayerError::invalid_index(from, len));
        }
        if to >= len {
            return Err(PlayerError::invalid_index(to, len));
        }
        if from == to {
            return Ok(());
        }

        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);

        let remap = move |index: usize| moved_index(index, from, to);
        self.current = self.current.map(remap);
        self.history.remap(remap);
        self.reserved = self.reserved.map(remap);

        Ok(())
    }

    /// Remove every track and reset position and history
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
        self.history.clear();
        self.reserved = None;
    }

    // ===== Rollback =====

    /// Snapshot position, history and reservation
    pub fn checkpoint(&self) -> SequencerCheckpoint {
        SequencerCheckpoint {
            current: self.current,
            history: self.history.clone(),
            reserved: self.reserved,
        }
    }

    /// Return to a snapshot taken with [`Sequencer::checkpoint`]
    pub fn restore(&mut self, checkpoint: SequencerCheckpoint) {
        self.current = checkpoint.current;
        self.history = checkpoint.history;
        self.reserved = checkpoint.reserved;
    }

    // ===== State Queries =====

    /// All tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at `index`
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Position of the track now playing
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Track now playing
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    /// Whether shuffle mode is on
    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Shuffle visits since the last reset
    pub fn history(&self) -> &ShuffleHistory {
        &self.history
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn ensure_not_empty(&self) -> Result<usize> {
        match self.tracks.len() {
            0 => Err(PlayerError::EmptyPlaylist),
            len => Ok(len),
        }
    }

    fn sequential_next(&self, len: usize) -> usize {
        self.current.map_or(0, |current| (current + 1) % len)
    }

    /// Unvisited positions other than the current one
    ///
    /// When none are left, falls back to every position except the current
    /// one and reports the history as exhausted.
    fn shuffle_candidates(&self) -> (Vec<usize>, bool) {
        let current = self.current;
        let fresh: Vec<usize> = (0..self.tracks.len())
            .filter(|index| Some(*index) != current && !self.history.contains(*index))
            .collect();
        if !fresh.is_empty() {
            return (fresh, false);
        }

        let all_but_current = (0..self.tracks.len())
            .filter(|index| Some(*index) != current)
            .collect();
        (all_but_current, true)
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("len", &self.tracks.len())
            .field("current", &self.current)
            .field("shuffle", &self.shuffle)
            .field("history", &self.history)
            .field("reserved", &self.reserved)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_test_track(id: &str) -> Track {
        Track::new(format!("Song {}", id), format!("Artist {}", id), format!("song{}.mp3", id))
    }

    fn sequencer_with(count: usize, shuffle: bool) -> Sequencer {
        let mut sequencer = Sequencer::with_seed(shuffle, 7);
        for i in 0..count {
            sequencer.add_track(create_test_track(&i.to_string())).unwrap();
        }
        sequencer
    }

    #[test]
    fn sequential_next_wraps_around() {
        let mut sequencer = sequencer_with(3, false);
        sequencer.on_track_loaded(0).unwrap();

        let mut visited = vec![];
        for _ in 0..3 {
            let next = sequencer.compute_next().unwrap();
            sequencer.on_track_loaded(next).unwrap();
            visited.push(next);
        }

        assert_eq!(visited, vec![1, 2, 0]);
    }

    #[test]
    fn sequential_previous_wraps_around() {
        let mut sequencer = sequencer_with(3, false);
        sequencer.on_track_loaded(0).unwrap();

        assert_eq!(sequencer.compute_previous().unwrap(), 2);
    }

    #[test]
    fn nothing_played_starts_at_first_track() {
        let mut sequencer = sequencer_with(3, false);
        assert_eq!(sequencer.compute_next().unwrap(), 0);
    }

    #[test]
    fn empty_playlist_fails_fast() {
        let mut sequencer = Sequencer::with_seed(false, 1);
        assert!(matches!(sequencer.compute_next(), Err(PlayerError::EmptyPlaylist)));
        assert!(matches!(sequencer.compute_previous(), Err(PlayerError::EmptyPlaylist)));
        assert!(matches!(sequencer.peek_next(), Err(PlayerError::EmptyPlaylist)));

        let mut shuffled = Sequencer::with_seed(true, 1);
        assert!(matches!(shuffled.compute_next(), Err(PlayerError::EmptyPlaylist)));
    }

    #[test]
    fn single_track_shuffle_always_returns_it() {
        let mut sequencer = sequencer_with(1, true);
        sequencer.on_track_loaded(0).unwrap();

        for _ in 0..10 {
            assert_eq!(sequencer.compute_next().unwrap(), 0);
            sequencer.on_track_loaded(0).unwrap();
        }
        assert!(sequencer.history().len() <= 1);
    }

    #[test]
    fn shuffle_visits_every_track_before_repeating() {
        let mut sequencer = sequencer_with(6, true);
        sequencer.on_track_loaded(0).unwrap();

        let mut seen = HashSet::from([0]);
        for _ in 0..5 {
            let next = sequencer.compute_next().unwrap();
            assert!(seen.insert(next), "index {} repeated within a cycle", next);
            sequencer.on_track_loaded(next).unwrap();
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn shuffle_wrap_does_not_repeat_current() {
        let mut sequencer = sequencer_with(3, true);
        sequencer.on_track_loaded(0).unwrap();

        let mut previous = 0;
        for _ in 0..20 {
            let next = sequencer.compute_next().unwrap();
            assert_ne!(next, previous);
            sequencer.on_track_loaded(next).unwrap();
            assert!(sequencer.history().len() <= 3);
            previous = next;
        }
    }

    #[test]
    fn shuffle_previous_walks_back_through_picks() {
        let mut sequencer = sequencer_with(5, true);
        sequencer.on_track_loaded(2).unwrap();

        let mut played = vec![2];
        for _ in 0..3 {
            let next = sequencer.compute_next().unwrap();
            sequencer.on_track_loaded(next).unwrap();
            played.push(next);
        }

        for expected in played.iter().rev().skip(1) {
            let previous = sequencer.compute_previous().unwrap();
            assert_eq!(previous, *expected);
            sequencer.on_track_loaded(previous).unwrap();
        }
    }

    #[test]
    fn reseed_keeps_playlist_and_position() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(2).unwrap();
        sequencer.peek_next().unwrap();

        sequencer.reseed(99);

        assert_eq!(sequencer.len(), 4);
        assert_eq!(sequencer.current(), Some(2));
        assert_eq!(sequencer.history().as_slice(), &[2]);

        // Same seed, same draws
        let mut twin = sequencer_with(4, true);
        twin.on_track_loaded(2).unwrap();
        twin.reseed(99);
        assert_eq!(sequencer.compute_next().unwrap(), twin.compute_next().unwrap());
    }

    #[test]
    fn shuffle_previous_after_reselecting_visited_track() {
        let mut sequencer = sequencer_with(5, true);
        for index in [0, 3, 1] {
            sequencer.on_track_loaded(index).unwrap();
        }

        // Clicking an entry that was already visited
        sequencer.on_track_loaded(3).unwrap();
        assert_eq!(sequencer.history().as_slice(), &[0, 1, 3]);

        assert_eq!(sequencer.compute_previous().unwrap(), 1);
    }

    #[test]
    fn shuffle_previous_without_history_falls_back() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(1).unwrap();

        // Only the current track recorded
        assert_eq!(sequencer.compute_previous().unwrap(), 0);
    }

    #[test]
    fn peek_does_not_touch_history() {
        let mut sequencer = sequencer_with(5, true);
        sequencer.on_track_loaded(0).unwrap();
        let before = sequencer.history().clone();

        let peeked = sequencer.peek_next().unwrap();
        assert_eq!(sequencer.history(), &before);
        assert_eq!(sequencer.peek_next().unwrap(), peeked);

        // The reserved pick is what plays
        assert_eq!(sequencer.compute_next().unwrap(), peeked);
    }

    #[test]
    fn stale_reservation_is_redrawn() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(0).unwrap();
        let peeked = sequencer.peek_next().unwrap();

        // Jump straight to the reserved track; it is no longer a candidate
        sequencer.on_track_loaded(peeked).unwrap();
        let next = sequencer.compute_next().unwrap();
        assert_ne!(next, peeked);
    }

    #[test]
    fn toggle_on_jumps_elsewhere() {
        let mut sequencer = sequencer_with(4, false);
        sequencer.on_track_loaded(3).unwrap();

        let jump = sequencer.toggle_shuffle();
        assert!(sequencer.is_shuffle());
        assert!(matches!(jump, Some(index) if index != 3 && index < 4));
        assert!(sequencer.history().is_empty());
    }

    #[test]
    fn toggle_off_clears_history_without_jump() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(0).unwrap();
        sequencer.compute_next().unwrap();

        assert_eq!(sequencer.toggle_shuffle(), None);
        assert!(!sequencer.is_shuffle());
        assert!(sequencer.history().is_empty());
    }

    #[test]
    fn toggle_on_single_track_has_nowhere_to_jump() {
        let mut sequencer = sequencer_with(1, false);
        sequencer.on_track_loaded(0).unwrap();
        assert_eq!(sequencer.toggle_shuffle(), None);
    }

    #[test]
    fn on_track_loaded_appends_once() {
        let mut sequencer = sequencer_with(3, true);
        sequencer.on_track_loaded(1).unwrap();
        sequencer.on_track_loaded(1).unwrap();
        assert_eq!(sequencer.history().as_slice(), &[1]);

        assert!(matches!(
            sequencer.on_track_loaded(3),
            Err(PlayerError::InvalidIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn moving_current_track_follows_it() {
        let mut sequencer = sequencer_with(3, false);
        sequencer.on_track_loaded(0).unwrap();

        sequencer.move_track(0, 2).unwrap();
        assert_eq!(sequencer.current(), Some(2));
        assert_eq!(sequencer.current_track().unwrap().title, "Song 0");
    }

    #[test]
    fn moving_across_current_shifts_it() {
        let mut sequencer = sequencer_with(4, false);
        sequencer.on_track_loaded(2).unwrap();

        sequencer.move_track(0, 3).unwrap();
        assert_eq!(sequencer.current(), Some(1));

        sequencer.move_track(3, 0).unwrap();
        assert_eq!(sequencer.current(), Some(2));

        // Move entirely below current: unchanged
        sequencer.move_track(3, 3).unwrap();
        sequencer.move_track(0, 1).unwrap();
        assert_eq!(sequencer.current(), Some(2));
    }

    #[test]
    fn move_remaps_history() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(0).unwrap();
        sequencer.on_track_loaded(3).unwrap();

        sequencer.move_track(3, 1).unwrap();
        assert_eq!(sequencer.history().as_slice(), &[0, 1]);
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let mut sequencer = sequencer_with(2, false);
        assert!(matches!(
            sequencer.move_track(2, 0),
            Err(PlayerError::InvalidIndex { index: 2, len: 2 })
        ));
        assert!(matches!(
            sequencer.move_track(0, 5),
            Err(PlayerError::InvalidIndex { index: 5, len: 2 })
        ));
    }

    #[test]
    fn insert_after_current_shifts_later_positions() {
        let mut sequencer = sequencer_with(4, true);
        sequencer.on_track_loaded(1).unwrap();
        sequencer.on_track_loaded(3).unwrap();
        sequencer.on_track_loaded(1).unwrap();

        let added = sequencer
            .add_tracks(vec![create_test_track("x"), create_test_track("y")], true)
            .unwrap();

        assert_eq!(added, AddedRange { start: 2, count: 2 });
        assert_eq!(sequencer.current(), Some(1));
        assert_eq!(sequencer.history().as_slice(), &[1, 5]);
        assert_eq!(sequencer.track(2).unwrap().title, "Song x");
        assert_eq!(sequencer.track(5).unwrap().title, "Song 3");
    }

    #[test]
    fn bulk_add_appends_without_current() {
        let mut sequencer = sequencer_with(2, false);
        let added = sequencer
            .add_tracks(vec![create_test_track("x")], true)
            .unwrap();
        assert_eq!(added, AddedRange { start: 2, count: 1 });
    }

    #[test]
    fn bulk_add_is_all_or_nothing() {
        let mut sequencer = sequencer_with(2, false);
        let result = sequencer.add_tracks(
            vec![create_test_track("x"), Track::new("", "Nobody", "bad.mp3")],
            false,
        );

        assert!(matches!(result, Err(PlayerError::InvalidTrack(_))));
        assert_eq!(sequencer.len(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let mut sequencer = sequencer_with(3, true);
        sequencer.on_track_loaded(1).unwrap();
        sequencer.peek_next().unwrap();

        sequencer.clear();
        assert!(sequencer.is_empty());
        assert_eq!(sequencer.current(), None);
        assert!(sequencer.history().is_empty());
    }

    #[test]
    fn restore_rolls_back_a_pick() {
        let mut sequencer = sequencer_with(5, true);
        sequencer.on_track_loaded(0).unwrap();
        let checkpoint = sequencer.checkpoint();

        sequencer.compute_next().unwrap();
        assert_eq!(sequencer.history().len(), 2);

        sequencer.restore(checkpoint.clone());
        assert_eq!(sequencer.checkpoint(), checkpoint);
        assert_eq!(sequencer.history().as_slice(), &[0]);
    }

    #[test]
    fn moved_index_splice_semantics() {
        // [a, b, c, d] move 1 -> 3 gives [a, c, d, b]
        assert_eq!(moved_index(0, 1, 3), 0);
        assert_eq!(moved_index(1, 1, 3), 3);
        assert_eq!(moved_index(2, 1, 3), 1);
        assert_eq!(moved_index(3, 1, 3), 2);

        // [a, b, c, d] move 3 -> 1 gives [a, d, b, c]
        assert_eq!(moved_index(1, 3, 1), 2);
        assert_eq!(moved_index(2, 3, 1), 3);
        assert_eq!(moved_index(3, 3, 1), 1);
        assert_eq!(moved_index(0, 3, 1), 0);
    }
}
