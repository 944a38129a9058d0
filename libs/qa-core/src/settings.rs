//! User-adjustable auto-mode settings.

use crate::auto::brightness::DEFAULT_DARKNESS_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_TIMER_SECONDS: f64 = 0.5;
pub const MAX_TIMER_SECONDS: f64 = 60.0;
pub const TIMER_STEP_SECONDS: f64 = 0.5;
pub const DEFAULT_TIMER_SECONDS: f64 = 2.0;

pub const MAX_DARKNESS_THRESHOLD: u32 = 250;
pub const THRESHOLD_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoSettings {
    timer_seconds: f64,
    darkness_threshold: u32,
    pub audio_enabled: bool,
}

impl Default for AutoSettings {
    fn default() -> Self {
        Self {
            timer_seconds: DEFAULT_TIMER_SECONDS,
            darkness_threshold: DEFAULT_DARKNESS_THRESHOLD,
            audio_enabled: true,
        }
    }
}

impl AutoSettings {
    pub fn new(timer_seconds: f64, darkness_threshold: u32, audio_enabled: bool) -> Self {
        let mut settings = Self {
            audio_enabled,
            ..Self::default()
        };
        settings.set_timer_seconds(timer_seconds);
        settings.set_darkness_threshold(darkness_threshold);
        settings
    }

    pub fn timer_seconds(&self) -> f64 {
        self.timer_seconds
    }

    pub fn timer(&self) -> Duration {
        Duration::from_secs_f64(self.timer_seconds)
    }

    /// Clamp to the allowed range, snapping to half seconds.
    pub fn set_timer_seconds(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds } else { DEFAULT_TIMER_SECONDS };
        let snapped = (seconds / TIMER_STEP_SECONDS).round() * TIMER_STEP_SECONDS;
        self.timer_seconds = snapped.clamp(MIN_TIMER_SECONDS, MAX_TIMER_SECONDS);
    }

    pub fn increase_timer(&mut self) -> f64 {
        self.set_timer_seconds(self.timer_seconds + TIMER_STEP_SECONDS);
        self.timer_seconds
    }

    pub fn decrease_timer(&mut self) -> f64 {
        self.set_timer_seconds(self.timer_seconds - TIMER_STEP_SECONDS);
        self.timer_seconds
    }

    pub fn darkness_threshold(&self) -> u32 {
        self.darkness_threshold
    }

    pub fn set_darkness_threshold(&mut self, threshold: u32) {
        self.darkness_threshold = threshold.min(MAX_DARKNESS_THRESHOLD);
    }

    pub fn increase_threshold(&mut self) -> u32 {
        self.set_darkness_threshold(self.darkness_threshold.saturating_add(THRESHOLD_STEP));
        self.darkness_threshold
    }

    pub fn decrease_threshold(&mut self) -> u32 {
        self.set_darkness_threshold(self.darkness_threshold.saturating_sub(THRESHOLD_STEP));
        self.darkness_threshold
    }

    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        self.audio_enabled
    }
}
