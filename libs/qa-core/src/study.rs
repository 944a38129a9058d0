//! Study navigator: multiple-choice recall over shuffled lots.
//!
//! The working order is the filtered deck with each lot shuffled on its own,
//! so lot boundaries stay at multiples of the lot size. Navigation never
//! leaves the current lot: it loops around it like a ring.

use crate::error::Result;
use crate::filter::filter_for_session;
use crate::lots::{shuffle_within_lots, LotBounds, LotPager, LOT_SIZE};
use crate::tags::SelectedTags;
use crate::types::Card;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// How long a chosen answer stays marked before it is resolved.
pub const ANSWER_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on random draws when looking for a different answer.
const MAX_WRONG_ANSWER_DRAWS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Display position of an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSlot {
    First,
    Second,
}

impl AnswerSlot {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }
}

/// The two answers offered for the current card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPair {
    pub options: [String; 2],
    pub correct: AnswerSlot,
}

impl AnswerPair {
    pub fn is_correct(&self, slot: AnswerSlot) -> bool {
        self.correct == slot
    }
}

/// An answer the user picked, awaiting resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub slot: AnswerSlot,
    pub correct: bool,
}

/// Counters shown in the study view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudyCounter {
    /// 1-based position inside the lot.
    pub position: usize,
    pub lot_len: usize,
    pub lot: usize,
    pub num_lots: usize,
}

#[derive(Debug, Clone)]
pub struct StudySession {
    order: Vec<usize>,
    pager: LotPager,
    lot_index: usize,
    current: usize,
    answers: Option<AnswerPair>,
    selection: Option<Selection>,
}

impl StudySession {
    /// Filter, shuffle each lot, and position on the first card of lot 1.
    pub fn start<R: Rng + ?Sized>(cards: &[Card], selected: &SelectedTags, rng: &mut R) -> Result<Self> {
        let mut order = filter_for_session(cards, selected)?;
        shuffle_within_lots(&mut order, LOT_SIZE, rng);
        Ok(Self::from_order(order))
    }

    /// Session over an already-arranged working order.
    pub fn from_order(order: Vec<usize>) -> Self {
        Self::with_pager(order, LOT_SIZE)
    }

    pub fn with_pager(order: Vec<usize>, lot_size: usize) -> Self {
        let pager = LotPager::with_lot_size(order.len(), lot_size);
        Self {
            order,
            pager,
            lot_index: 1,
            current: 0,
            answers: None,
            selection: None,
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn lot_index(&self) -> usize {
        self.lot_index
    }

    /// Global index into the working order.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Deck index of the card being shown.
    pub fn current_card(&self) -> Option<usize> {
        self.order.get(self.current).copied()
    }

    pub fn bounds(&self) -> Option<LotBounds> {
        self.pager.bounds(self.lot_index)
    }

    pub fn num_lots(&self) -> usize {
        self.pager.num_lots()
    }

    /// Step forward, looping back to the lot's first card after its last.
    pub fn advance(&mut self) {
        self.flip(Direction::Forward);
    }

    /// Tap navigation: the lot is a ring in both directions.
    pub fn flip(&mut self, direction: Direction) {
        let Some(LotBounds { start, end }) = self.bounds() else {
            return;
        };
        self.current = match direction {
            Direction::Forward if self.current < end => self.current + 1,
            Direction::Forward => start,
            Direction::Backward if self.current > start => self.current - 1,
            Direction::Backward => end,
        };
        self.card_changed();
    }

    pub fn next_lot(&mut self) {
        self.go_to_lot(self.pager.next_lot(self.lot_index));
    }

    pub fn prev_lot(&mut self) {
        self.go_to_lot(self.pager.prev_lot(self.lot_index));
    }

    fn go_to_lot(&mut self, lot: usize) {
        if let Some(bounds) = self.pager.bounds(lot) {
            self.lot_index = lot;
            self.current = bounds.start;
            self.card_changed();
        }
    }

    fn card_changed(&mut self) {
        self.answers = None;
        self.selection = None;
    }

    /// Answers currently on display, if dealt.
    pub fn answers(&self) -> Option<&AnswerPair> {
        self.answers.as_ref()
    }

    /// Deal a fresh pair for the current card: its answer plus one drawn
    /// from another card, in random order.
    pub fn deal_answers<R: Rng + ?Sized>(&mut self, cards: &[Card], rng: &mut R) -> Option<&AnswerPair> {
        let card = cards.get(self.current_card()?)?;
        let wrong = pick_wrong_answer(cards, &self.order, &card.answer, rng);
        let correct_first = rng.gen_bool(0.5);
        let (options, correct) = if correct_first {
            ([card.answer.clone(), wrong], AnswerSlot::First)
        } else {
            ([wrong, card.answer.clone()], AnswerSlot::Second)
        };
        self.selection = None;
        self.answers = Some(AnswerPair { options, correct });
        self.answers.as_ref()
    }

    /// Mark an answer as chosen. Returns whether it was correct, or `None`
    /// when no answers are on display.
    pub fn select_answer(&mut self, slot: AnswerSlot) -> Option<bool> {
        let correct = self.answers.as_ref()?.is_correct(slot);
        self.selection = Some(Selection { slot, correct });
        Some(correct)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Clear the chosen mark once the feedback delay has passed, advancing
    /// when the choice was correct. Returns whether the cursor moved.
    pub fn resolve_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(Selection { correct: true, .. }) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    pub fn counter(&self) -> Option<StudyCounter> {
        let bounds = self.bounds()?;
        Some(StudyCounter {
            position: self.current % self.pager.lot_size() + 1,
            lot_len: bounds.len(),
            lot: self.lot_index,
            num_lots: self.pager.num_lots(),
        })
    }
}

/// Draw an answer different from `correct` out of the filtered cards.
///
/// With a single card there is nothing else to draw, so its own answer is
/// returned. Random draws are bounded; if they keep hitting the same answer
/// the first differing answer in order is used, and if every card shares
/// the answer it is returned as-is.
pub fn pick_wrong_answer<R: Rng + ?Sized>(
    cards: &[Card],
    filtered: &[usize],
    correct: &str,
    rng: &mut R,
) -> String {
    let answers: Vec<&str> = filtered
        .iter()
        .filter_map(|&i| cards.get(i))
        .map(|c| c.answer.as_str())
        .collect();

    if answers.len() <= 1 {
        return answers.first().copied().unwrap_or(correct).to_string();
    }

    for _ in 0..MAX_WRONG_ANSWER_DRAWS {
        let candidate = answers[rng.gen_range(0..answers.len())];
        if candidate != correct {
            return candidate.to_string();
        }
    }

    answers
        .iter()
        .copied()
        .find(|a| *a != correct)
        .unwrap_or(correct)
        .to_string()
}
