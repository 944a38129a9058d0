//! Core engine for question/answer card review.
//!
//! Provides:
//! - Deck store with JSON import/export and tag editing
//! - Tag filtering over the selected tag set
//! - Batch review with resumable passes
//! - Lot-based study navigation with multiple-choice answers
//! - Auto-advance state machine gated by ambient light or audio completion
//!
//! Nothing here performs I/O or reads the clock for scheduling; randomness
//! is passed in and time-based work is returned as effects.

pub mod auto;
pub mod deck;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod lots;
pub mod review;
pub mod settings;
pub mod study;
pub mod tags;
pub mod types;

pub use auto::brightness::{mean_luma, BrightnessGate, GateReading, Transition};
pub use auto::{AutoAdvance, AutoCursor, AutoState, AutoStatus, AutoToken, Effect, SessionMode};
pub use deck::{DeckStore, TagAdded, DEFAULT_EXPORT_NAME};
pub use error::{ImportError, PlaybackError, Result, SensorError, ServiceError, ValidationError};
pub use filter::{filter_cards, filter_for_session};
pub use highlight::{highlight, HighlightSegment};
pub use lots::{LotBounds, LotPager, LOT_SIZE};
pub use review::{CardFaces, FaceFlip, FinishOutcome, Progress, ReviewEntry, ReviewSession, BATCH_SIZE};
pub use settings::AutoSettings;
pub use study::{AnswerPair, AnswerSlot, Direction, StudyCounter, StudySession};
pub use tags::{SelectedTags, TagIndex, FAVOURITE_TAG, NO_TAG};
pub use types::{Card, CardDraft, CardField};
