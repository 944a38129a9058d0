//! Batch review engine.
//!
//! Cards are delivered in random batches of up to [`BATCH_SIZE`], drawn
//! without replacement from a pool that covers one full pass over the
//! filtered cards. `pool`, `current_batch` and `batch_index` hold positions
//! in the filtered sequence; [`ReviewSession::current_card`] maps back to a
//! deck index.
//!
//! Outside of a draw, `reviewed_count + pool.len() + current_batch.len()`
//! always equals the number of filtered cards.

use crate::error::Result;
use crate::filter::filter_for_session;
use crate::tags::SelectedTags;
use crate::types::Card;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// Maximum cards per batch.
pub const BATCH_SIZE: usize = 20;

/// How long the completion notice stays up before the next pass starts.
pub const COMPLETION_DELAY: Duration = Duration::from_secs(1);

pub const COMPLETION_MESSAGE: &str = "You have reviewed all cards";

/// Progress split shown on the review progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub reviewed: usize,
    pub in_progress: usize,
    pub remaining: usize,
}

impl Progress {
    /// Reviewed share as a rounded percentage.
    pub fn pct_done(&self) -> u32 {
        percent(self.reviewed, self.total)
    }

    /// Remaining share as a rounded percentage.
    pub fn pct_remaining(&self) -> u32 {
        percent(self.remaining, self.total)
    }
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as u32
}

/// What `finish_batch` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The next batch was drawn immediately.
    NextBatch,
    /// Every card has been reviewed. Call [`ReviewSession::start_next_pass`]
    /// after [`COMPLETION_DELAY`].
    PassComplete,
}

/// How a review session was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEntry {
    Resumed,
    Started,
}

/// Result of flipping a card face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceFlip {
    /// The face now shows this text.
    Shown(String),
    /// The card has nothing on the back of this face.
    NoBack(&'static str),
}

/// Which side of the question and answer faces is showing.
///
/// Question flips to pronunciation, answer flips to meaning. Both reset to
/// the front whenever a different card is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardFaces {
    question_back: bool,
    answer_back: bool,
}

impl CardFaces {
    pub fn flip_question(&mut self, card: &Card) -> FaceFlip {
        let Some(back) = card.pronunciation_text() else {
            return FaceFlip::NoBack("No pronunciation");
        };
        self.question_back = !self.question_back;
        let text = if self.question_back { back } else { card.question.as_str() };
        FaceFlip::Shown(text.to_string())
    }

    pub fn flip_answer(&mut self, card: &Card) -> FaceFlip {
        let Some(back) = card.meaning_text() else {
            return FaceFlip::NoBack("No meaning");
        };
        self.answer_back = !self.answer_back;
        let text = if self.answer_back { back } else { card.answer.as_str() };
        FaceFlip::Shown(text.to_string())
    }

    pub fn question_text<'a>(&self, card: &'a Card) -> &'a str {
        match card.pronunciation_text() {
            Some(back) if self.question_back => back,
            _ => &card.question,
        }
    }

    pub fn answer_text<'a>(&self, card: &'a Card) -> &'a str {
        match card.meaning_text() {
            Some(back) if self.answer_back => back,
            _ => &card.answer,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Review state for one filtered card set.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    filtered: Vec<usize>,
    session_tags: Vec<String>,
    pool: Vec<usize>,
    reviewed_count: usize,
    current_batch: Vec<usize>,
    batch_index: usize,
    batch_size: usize,
    pass_complete: bool,
    started_at: DateTime<Utc>,
    faces: CardFaces,
}

impl ReviewSession {
    /// Session over already-filtered deck indices. Nothing is drawn yet.
    pub fn new(filtered: Vec<usize>, session_tags: Vec<String>) -> Self {
        Self {
            filtered,
            session_tags,
            pool: Vec::new(),
            reviewed_count: 0,
            current_batch: Vec::new(),
            batch_index: 0,
            batch_size: BATCH_SIZE,
            pass_complete: false,
            started_at: Utc::now(),
            faces: CardFaces::default(),
        }
    }

    /// Filter the deck with the current selection and draw the first batch.
    pub fn start<R: Rng + ?Sized>(cards: &[Card], selected: &SelectedTags, rng: &mut R) -> Result<Self> {
        let filtered = filter_for_session(cards, selected)?;
        let mut session = Self::new(filtered, selected.sorted());
        session.draw_batch(rng);
        Ok(session)
    }

    /// Resume `existing` when it was started with the same tag set and has
    /// state worth resuming; otherwise start a brand-new session.
    pub fn resume_or_start<R: Rng + ?Sized>(
        existing: Option<Self>,
        cards: &[Card],
        selected: &SelectedTags,
        rng: &mut R,
    ) -> Result<(Self, ReviewEntry)> {
        match existing {
            Some(session) if session.is_resumable() && session.matches_selection(selected) => {
                Ok((session, ReviewEntry::Resumed))
            }
            _ => Ok((Self::start(cards, selected, rng)?, ReviewEntry::Started)),
        }
    }

    /// Refill the pool on a fresh pass, then draw up to `batch_size` random
    /// positions out of it. The previous batch is discarded.
    pub fn draw_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.pool.is_empty() && self.reviewed_count == 0 {
            self.pool = (0..self.filtered.len()).collect();
        }

        self.current_batch.clear();
        while self.current_batch.len() < self.batch_size && !self.pool.is_empty() {
            let pick = rng.gen_range(0..self.pool.len());
            self.current_batch.push(self.pool.swap_remove(pick));
        }
        self.batch_index = 0;
        self.faces.reset();
    }

    /// Commit the current batch as reviewed and move on.
    pub fn finish_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FinishOutcome {
        if self.pass_complete {
            return FinishOutcome::PassComplete;
        }

        self.reviewed_count += self.current_batch.len();
        if self.reviewed_count >= self.filtered.len() {
            self.reviewed_count = self.filtered.len();
            self.current_batch.clear();
            self.batch_index = 0;
            self.pass_complete = true;
            return FinishOutcome::PassComplete;
        }

        self.draw_batch(rng);
        FinishOutcome::NextBatch
    }

    /// Begin the next pass after a completed one.
    pub fn start_next_pass<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool.clear();
        self.reviewed_count = 0;
        self.pass_complete = false;
        self.draw_batch(rng);
    }

    /// Discard all progress and start over with a full pool.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool = (0..self.filtered.len()).collect();
        self.reviewed_count = 0;
        self.pass_complete = false;
        self.draw_batch(rng);
    }

    /// Move to the next card of the batch, wrapping at the end.
    pub fn next(&mut self) {
        if self.current_batch.is_empty() {
            return;
        }
        self.batch_index = (self.batch_index + 1) % self.current_batch.len();
        self.faces.reset();
    }

    /// Move to the previous card of the batch, wrapping at the start.
    pub fn prev(&mut self) {
        if self.current_batch.is_empty() {
            return;
        }
        let len = self.current_batch.len();
        self.batch_index = (self.batch_index + len - 1) % len;
        self.faces.reset();
    }

    pub fn progress(&self) -> Progress {
        let total = self.filtered.len();
        let in_progress = self.current_batch.len();
        Progress {
            total,
            reviewed: self.reviewed_count,
            in_progress,
            remaining: total.saturating_sub(self.reviewed_count + in_progress),
        }
    }

    /// Deck index of the card being shown.
    pub fn current_card(&self) -> Option<usize> {
        self.current_batch
            .get(self.batch_index)
            .and_then(|&pos| self.filtered.get(pos))
            .copied()
    }

    /// `(position, batch length)` for the card counter, 1-based.
    pub fn counter(&self) -> Option<(usize, usize)> {
        (!self.current_batch.is_empty()).then(|| (self.batch_index + 1, self.current_batch.len()))
    }

    /// The sorted tag set this session was started with.
    pub fn session_tags(&self) -> &[String] {
        &self.session_tags
    }

    pub fn matches_selection(&self, selected: &SelectedTags) -> bool {
        self.session_tags == selected.sorted()
    }

    /// Any progress or drawn cards to come back to.
    pub fn is_resumable(&self) -> bool {
        !self.pool.is_empty() || self.reviewed_count > 0 || !self.current_batch.is_empty()
    }

    pub fn is_pass_complete(&self) -> bool {
        self.pass_complete
    }

    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    pub fn current_batch(&self) -> &[usize] {
        &self.current_batch
    }

    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviewed_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn faces(&self) -> &CardFaces {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut CardFaces {
        &mut self.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn session(len: usize) -> ReviewSession {
        ReviewSession::new((0..len).collect(), vec!["x".into()])
    }

    fn assert_conserved(s: &ReviewSession) {
        assert_eq!(
            s.reviewed_count() + s.pool().len() + s.current_batch().len(),
            s.filtered().len()
        );
        let p = s.progress();
        assert_eq!(p.reviewed + p.in_progress + p.remaining, p.total);
    }

    #[test]
    fn first_draw_fills_pool_and_takes_a_batch() {
        let mut rng = rng();
        let mut s = session(45);
        s.draw_batch(&mut rng);
        assert_eq!(s.current_batch().len(), BATCH_SIZE);
        assert_eq!(s.pool().len(), 25);
        assert_eq!(s.batch_index(), 0);
        assert_conserved(&s);
    }

    #[test]
    fn no_duplicates_within_a_pass() {
        let mut rng = rng();
        let mut s = session(45);
        s.draw_batch(&mut rng);

        let mut seen = HashSet::new();
        loop {
            for &pos in s.current_batch() {
                assert!(pos < 45);
                assert!(seen.insert(pos), "position {pos} delivered twice");
            }
            assert_conserved(&s);
            if s.finish_batch(&mut rng) == FinishOutcome::PassComplete {
                break;
            }
        }
        assert_eq!(seen.len(), 45);
    }

    #[test]
    fn batch_sizes_follow_the_pool() {
        let mut rng = rng();
        let mut s = session(45);
        s.draw_batch(&mut rng);
        assert_eq!(s.finish_batch(&mut rng), FinishOutcome::NextBatch);
        assert_eq!(s.current_batch().len(), 20);
        assert_eq!(s.finish_batch(&mut rng), FinishOutcome::NextBatch);
        assert_eq!(s.current_batch().len(), 5);
        assert!(s.pool().is_empty());
        assert_eq!(s.finish_batch(&mut rng), FinishOutcome::PassComplete);
    }

    #[test]
    fn completed_pass_shows_full_progress_then_restarts() {
        let mut rng = rng();
        let mut s = session(12);
        s.draw_batch(&mut rng);
        assert_eq!(s.finish_batch(&mut rng), FinishOutcome::PassComplete);

        let p = s.progress();
        assert_eq!(p, Progress { total: 12, reviewed: 12, in_progress: 0, remaining: 0 });
        assert_eq!(p.pct_done(), 100);
        assert!(s.is_pass_complete());
        assert_eq!(s.current_card(), None);

        s.start_next_pass(&mut rng);
        assert_eq!(s.reviewed_count(), 0);
        assert_eq!(s.current_batch().len(), 12);
        assert!(s.pool().is_empty());
        assert!(!s.is_pass_complete());
        assert_conserved(&s);
    }

    #[test]
    fn next_pass_refills_whole_pool() {
        let mut rng = rng();
        let mut s = session(30);
        s.draw_batch(&mut rng);
        s.finish_batch(&mut rng);
        assert_eq!(s.finish_batch(&mut rng), FinishOutcome::PassComplete);

        s.start_next_pass(&mut rng);
        assert_eq!(s.pool().len() + s.current_batch().len(), 30);
        assert_eq!(s.reviewed_count(), 0);
    }

    #[test]
    fn reset_discards_progress() {
        let mut rng = rng();
        let mut s = session(50);
        s.draw_batch(&mut rng);
        s.finish_batch(&mut rng);
        assert_eq!(s.reviewed_count(), 20);

        s.reset(&mut rng);
        assert_eq!(s.reviewed_count(), 0);
        assert_eq!(s.pool().len(), 30);
        assert_eq!(s.current_batch().len(), 20);
        assert_conserved(&s);
    }

    #[test]
    fn navigation_wraps_within_batch() {
        let mut rng = rng();
        let mut s = session(3);
        s.draw_batch(&mut rng);
        s.prev();
        assert_eq!(s.batch_index(), 2);
        s.next();
        assert_eq!(s.batch_index(), 0);
        s.next();
        s.next();
        s.next();
        assert_eq!(s.batch_index(), 0);
        assert_eq!(s.reviewed_count(), 0);
        assert_eq!(s.counter(), Some((1, 3)));
    }

    #[test]
    fn resume_requires_same_tags() {
        let cards: Vec<Card> = (0..30)
            .map(|i| Card::new(format!("q{i}"), format!("a{i}")).with_tags(["a", "b"]))
            .collect();
        let mut rng = rng();
        let ab: SelectedTags = ["b", "a"].into_iter().collect();

        let (mut s, entry) = ReviewSession::resume_or_start(None, &cards, &ab, &mut rng).unwrap();
        assert_eq!(entry, ReviewEntry::Started);
        assert_eq!(s.session_tags(), ["a".to_string(), "b".to_string()]);
        s.finish_batch(&mut rng);
        let batch = s.current_batch().to_vec();

        let (s, entry) = ReviewSession::resume_or_start(Some(s), &cards, &ab, &mut rng).unwrap();
        assert_eq!(entry, ReviewEntry::Resumed);
        assert_eq!(s.reviewed_count(), 20);
        assert_eq!(s.current_batch(), batch.as_slice());

        let a: SelectedTags = ["a"].into_iter().collect();
        let (s, entry) = ReviewSession::resume_or_start(Some(s), &cards, &a, &mut rng).unwrap();
        assert_eq!(entry, ReviewEntry::Started);
        assert_eq!(s.reviewed_count(), 0);
        assert_eq!(s.pool().len(), 10);
    }

    #[test]
    fn resumed_session_keeps_its_start_time() {
        let cards: Vec<Card> = (0..30).map(|i| Card::new(format!("q{i}"), format!("a{i}")).with_tags(["a", "b"])).collect();
        let mut rng = rng();
        let a: SelectedTags = ["a"].into_iter().collect();
        let b: SelectedTags = ["b"].into_iter().collect();

        let (mut s, _) = ReviewSession::resume_or_start(None, &cards, &a, &mut rng).unwrap();
        let started = s.started_at();
        s.finish_batch(&mut rng);

        let (s, entry) = ReviewSession::resume_or_start(Some(s), &cards, &a, &mut rng).unwrap();
        assert_eq!(entry, ReviewEntry::Resumed);
        assert_eq!(s.started_at(), started);

        let (s, entry) = ReviewSession::resume_or_start(Some(s), &cards, &b, &mut rng).unwrap();
        assert_eq!(entry, ReviewEntry::Started);
        assert!(s.started_at() >= started);
    }

    #[test]
    fn percentages_round_like_the_progress_bar() {
        let p = Progress { total: 3, reviewed: 1, in_progress: 1, remaining: 1 };
        assert_eq!(p.pct_done(), 33);
        let p = Progress { total: 8, reviewed: 5, in_progress: 0, remaining: 3 };
        assert_eq!(p.pct_done(), 63);
        assert_eq!(p.pct_remaining(), 38);
        let empty = Progress { total: 0, reviewed: 0, in_progress: 0, remaining: 0 };
        assert_eq!(empty.pct_done(), 0);
    }

    #[test]
    fn faces_flip_and_reset_on_navigation() {
        let mut card = Card::new("chat", "cat");
        card.pronunciation = Some("sha".into());

        let mut faces = CardFaces::default();
        assert_eq!(faces.flip_question(&card), FaceFlip::Shown("sha".into()));
        assert_eq!(faces.question_text(&card), "sha");
        assert_eq!(faces.flip_question(&card), FaceFlip::Shown("chat".into()));
        assert_eq!(faces.flip_answer(&card), FaceFlip::NoBack("No meaning"));

        let mut rng = rng();
        let mut s = session(2);
        s.draw_batch(&mut rng);
        s.faces_mut().flip_question(&card);
        s.next();
        assert_eq!(s.faces().question_text(&card), "chat");
    }
}
