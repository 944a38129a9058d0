//! Hands-free advancement.
//!
//! [`AutoAdvance`] is a pure state machine. Each input (toggle, timer fire,
//! audio end, sensor frame) returns a list of [`Effect`]s for the caller to
//! carry out: scheduling timers, starting the sensor, playing audio. Timers
//! and audio playback carry an [`AutoToken`]; a completion whose token is no
//! longer current is ignored, so a late timer or clip never advances a
//! session that has since been cancelled or rescheduled.

pub mod brightness;

use crate::review::ReviewSession;
use crate::settings::AutoSettings;
use crate::study::StudySession;
use crate::types::Card;
use brightness::{BrightnessGate, Transition, SAMPLE_INTERVAL};
use std::time::Duration;

pub const PAUSED_DARK_MESSAGE: &str = "PAUSED (Dark)";
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Camera not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Review,
    Study,
}

/// Identifies one scheduled timer or one audio clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutoToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoState {
    Off,
    TimerWait { token: AutoToken },
    PausedDark,
    AudioPlaying { token: AutoToken },
}

impl AutoState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoStatus {
    PausedDark,
    CameraUnavailable(String),
    Clear,
}

impl AutoStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::PausedDark => Some(PAUSED_DARK_MESSAGE),
            Self::CameraUnavailable(_) => Some(CAMERA_UNAVAILABLE_MESSAGE),
            Self::Clear => None,
        }
    }
}

/// Work the caller must perform after feeding an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartSensor { interval: Duration },
    StopSensor,
    ScheduleTimer { token: AutoToken, after: Duration },
    CancelTimer,
    PlayAudio { token: AutoToken, card: usize },
    StopAudio,
    /// The cursor moved; redraw the current card.
    Advanced,
    Status(AutoStatus),
}

/// A session the controller can step through.
pub trait AutoCursor {
    /// Deck index of the card being shown.
    fn current_card(&self) -> Option<usize>;
    fn step(&mut self);
}

impl AutoCursor for ReviewSession {
    fn current_card(&self) -> Option<usize> {
        ReviewSession::current_card(self)
    }

    fn step(&mut self) {
        self.next();
    }
}

impl AutoCursor for StudySession {
    fn current_card(&self) -> Option<usize> {
        StudySession::current_card(self)
    }

    fn step(&mut self) {
        self.advance();
    }
}

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    mode: SessionMode,
    state: AutoState,
    settings: AutoSettings,
    gate: BrightnessGate,
    audio_engine: bool,
    next_token: u64,
}

impl AutoAdvance {
    pub fn new(mode: SessionMode, settings: AutoSettings, audio_engine: bool) -> Self {
        Self {
            mode,
            state: AutoState::Off,
            settings,
            gate: BrightnessGate::new(settings.darkness_threshold()),
            audio_engine,
            next_token: 0,
        }
    }

    pub fn state(&self) -> AutoState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_light(&self) -> bool {
        self.gate.is_light()
    }

    /// Flip between off and active.
    pub fn toggle<C: AutoCursor>(&mut self, cursor: &mut C, cards: &[Card]) -> Vec<Effect> {
        if self.is_active() {
            self.exit()
        } else {
            self.enter(cursor, cards)
        }
    }

    pub fn enter<C: AutoCursor>(&mut self, cursor: &mut C, cards: &[Card]) -> Vec<Effect> {
        if self.is_active() {
            return Vec::new();
        }
        self.gate.reset();
        let mut effects = Vec::new();
        if self.mode == SessionMode::Review {
            effects.push(Effect::StartSensor { interval: SAMPLE_INTERVAL });
        }
        effects.extend(self.decide(cursor, cards, true));
        effects
    }

    pub fn exit(&mut self) -> Vec<Effect> {
        let previous = std::mem::replace(&mut self.state, AutoState::Off);
        if !previous.is_active() {
            return Vec::new();
        }
        let mut effects = vec![Effect::CancelTimer];
        if matches!(previous, AutoState::AudioPlaying { .. }) {
            effects.push(Effect::StopAudio);
        }
        if self.mode == SessionMode::Review {
            effects.push(Effect::StopSensor);
        }
        effects.push(Effect::Status(AutoStatus::Clear));
        effects
    }

    pub fn timer_fired<C: AutoCursor>(&mut self, token: AutoToken, cursor: &mut C, cards: &[Card]) -> Vec<Effect> {
        if self.state != (AutoState::TimerWait { token }) {
            return Vec::new();
        }
        if !self.gate.is_light() {
            // Review waits here for the light transition; study keeps ticking.
            return match self.mode {
                SessionMode::Review => {
                    self.state = AutoState::PausedDark;
                    Vec::new()
                }
                SessionMode::Study => self.schedule_timer(),
            };
        }
        cursor.step();
        let mut effects = vec![Effect::Advanced];
        effects.extend(self.decide(cursor, cards, true));
        effects
    }

    pub fn audio_ended<C: AutoCursor>(&mut self, token: AutoToken, cursor: &mut C, cards: &[Card]) -> Vec<Effect> {
        if self.state != (AutoState::AudioPlaying { token }) {
            return Vec::new();
        }
        cursor.step();
        let mut effects = vec![Effect::Advanced];
        effects.extend(self.decide(cursor, cards, true));
        effects
    }

    /// Decode or playback failed: fall back to the timer for this card only.
    pub fn audio_failed<C: AutoCursor>(&mut self, token: AutoToken, cursor: &mut C, cards: &[Card]) -> Vec<Effect> {
        if self.state != (AutoState::AudioPlaying { token }) {
            return Vec::new();
        }
        self.decide(cursor, cards, false)
    }

    /// Feed one sensor reading.
    pub fn frame_sampled(&mut self, luma: f64) -> Vec<Effect> {
        let reading = self.gate.sample(luma);
        // Gating applies to timer waits and dark pauses, never to a clip in flight.
        if !self.is_active() || matches!(self.state, AutoState::AudioPlaying { .. }) {
            return Vec::new();
        }

        match (reading.transition, self.state) {
            (Some(Transition::LightToDark), AutoState::TimerWait { .. }) => {
                self.state = AutoState::PausedDark;
                vec![Effect::CancelTimer, Effect::Status(AutoStatus::PausedDark)]
            }
            (Some(Transition::DarkToLight), AutoState::PausedDark) => {
                let mut effects = vec![Effect::Status(AutoStatus::Clear)];
                effects.extend(self.schedule_timer());
                effects
            }
            _ => Vec::new(),
        }
    }

    /// The sensor could not be acquired; auto mode turns off.
    pub fn sensor_unavailable(&mut self, reason: impl Into<String>) -> Vec<Effect> {
        let mut effects = self.exit();
        effects.retain(|e| *e != Effect::Status(AutoStatus::Clear));
        effects.push(Effect::Status(AutoStatus::CameraUnavailable(reason.into())));
        effects
    }

    /// Apply a new timer value, restarting a pending wait with it.
    pub fn set_timer_seconds(&mut self, seconds: f64) -> Vec<Effect> {
        self.settings.set_timer_seconds(seconds);
        self.restart_timer()
    }

    pub fn set_darkness_threshold(&mut self, threshold: u32) {
        self.settings.set_darkness_threshold(threshold);
        self.gate.set_threshold(self.settings.darkness_threshold());
    }

    /// Takes effect from the next card decision. A pending timer wait or
    /// dark pause keeps following the light gate until then.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.settings.audio_enabled = enabled;
    }

    fn restart_timer(&mut self) -> Vec<Effect> {
        match self.state {
            AutoState::TimerWait { .. } => {
                let mut effects = vec![Effect::CancelTimer];
                effects.extend(self.schedule_timer());
                effects
            }
            _ => Vec::new(),
        }
    }

    /// Whether the current card advances by audio completion.
    fn uses_audio<C: AutoCursor>(&self, cursor: &C, cards: &[Card]) -> bool {
        self.mode == SessionMode::Review
            && self.settings.audio_enabled
            && self.audio_engine
            && cursor
                .current_card()
                .and_then(|i| cards.get(i))
                .is_some_and(Card::has_audio)
    }

    /// Pick the advancement channel for the card now showing.
    fn decide<C: AutoCursor>(&mut self, cursor: &C, cards: &[Card], allow_audio: bool) -> Vec<Effect> {
        let mut effects = vec![Effect::CancelTimer];
        match cursor.current_card() {
            Some(card) if allow_audio && self.uses_audio(cursor, cards) => {
                let token = self.issue_token();
                self.state = AutoState::AudioPlaying { token };
                effects.push(Effect::PlayAudio { token, card });
            }
            _ if self.mode == SessionMode::Review && !self.gate.is_light() => {
                self.state = AutoState::PausedDark;
                effects.push(Effect::Status(AutoStatus::PausedDark));
            }
            _ => effects.extend(self.schedule_timer()),
        }
        effects
    }

    fn schedule_timer(&mut self) -> Vec<Effect> {
        let token = self.issue_token();
        self.state = AutoState::TimerWait { token };
        vec![Effect::ScheduleTimer {
            token,
            after: self.settings.timer(),
        }]
    }

    fn issue_token(&mut self) -> AutoToken {
        self.next_token += 1;
        AutoToken(self.next_token)
    }
}
