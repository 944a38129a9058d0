//! Ambient-light gate fed by camera frames.

use std::time::Duration;

/// Interval between sensor samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(150);

/// Consecutive dark frames needed before the gate reports dark.
pub const REQUIRED_DARK_FRAMES: u32 = 5;

pub const DEFAULT_DARKNESS_THRESHOLD: u32 = 20;

/// Mean luma of an RGBA buffer, sampling every fourth pixel.
///
/// Luma is the plain average of the red, green and blue channels. Returns
/// `None` for a buffer too short to hold a pixel.
pub fn mean_luma(rgba: &[u8]) -> Option<f64> {
    let (sum, count) = rgba
        .chunks_exact(4)
        .step_by(4)
        .fold((0u64, 0u64), |(sum, count), px| {
            let rgb = u64::from(px[0]) + u64::from(px[1]) + u64::from(px[2]);
            (sum + rgb, count + 1)
        });
    if count == 0 {
        return None;
    }
    Some(sum as f64 / 3.0 / count as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    LightToDark,
    DarkToLight,
}

/// Outcome of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateReading {
    pub is_light: bool,
    /// Set on exactly the sample where the reported state flipped.
    pub transition: Option<Transition>,
}

/// Debounced dark/light detector.
#[derive(Debug, Clone)]
pub struct BrightnessGate {
    threshold: u32,
    dark_frames: u32,
    previous_light: bool,
}

impl Default for BrightnessGate {
    fn default() -> Self {
        Self::new(DEFAULT_DARKNESS_THRESHOLD)
    }
}

impl BrightnessGate {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            dark_frames: 0,
            previous_light: true,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
    }

    /// Last reported state. A fresh gate reports light.
    pub fn is_light(&self) -> bool {
        self.previous_light
    }

    /// Forget the frame history and report light again.
    pub fn reset(&mut self) {
        self.dark_frames = 0;
        self.previous_light = true;
    }

    pub fn sample(&mut self, luma: f64) -> GateReading {
        self.dark_frames = if luma < f64::from(self.threshold) {
            (self.dark_frames + 1).min(REQUIRED_DARK_FRAMES + 1)
        } else {
            0
        };
        let is_light = self.dark_frames < REQUIRED_DARK_FRAMES;

        let transition = match (self.previous_light, is_light) {
            (true, false) => Some(Transition::LightToDark),
            (false, true) => Some(Transition::DarkToLight),
            _ => None,
        };
        self.previous_light = is_light;

        GateReading { is_light, transition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn four_dark_frames_then_light_stays_light() {
        let mut gate = BrightnessGate::new(20);
        for _ in 0..4 {
            assert!(gate.sample(5.0).is_light);
        }
        let reading = gate.sample(100.0);
        assert_eq!(reading, GateReading { is_light: true, transition: None });
    }

    #[test]
    fn fifth_dark_frame_reports_dark_once() {
        let mut gate = BrightnessGate::new(20);
        for _ in 0..4 {
            gate.sample(5.0);
        }
        assert_eq!(
            gate.sample(5.0),
            GateReading { is_light: false, transition: Some(Transition::LightToDark) }
        );
        assert_eq!(gate.sample(5.0).transition, None);
        assert_eq!(gate.sample(5.0).transition, None);
        assert!(!gate.is_light());
    }

    #[test]
    fn single_bright_frame_reports_light() {
        let mut gate = BrightnessGate::new(20);
        for _ in 0..10 {
            gate.sample(0.0);
        }
        assert_eq!(
            gate.sample(21.0),
            GateReading { is_light: true, transition: Some(Transition::DarkToLight) }
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut gate = BrightnessGate::new(20);
        for _ in 0..6 {
            gate.sample(20.0);
        }
        assert!(gate.is_light());
    }

    #[test]
    fn luma_samples_every_fourth_pixel() {
        let mut frame = Vec::new();
        for i in 0..8u8 {
            let v = if i % 4 == 0 { 90 } else { 0 };
            frame.extend_from_slice(&[v, v, v, 255]);
        }
        assert_eq!(mean_luma(&frame), Some(90.0));
        assert_eq!(mean_luma(&[1, 2]), None);
    }
}
