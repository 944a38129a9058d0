//! Camera frames for the brightness gate.

use async_trait::async_trait;
use qa_core::{mean_luma, SensorError};

/// One RGBA frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// Frame filled with a single grey level.
    pub fn uniform(width: u32, height: u32, level: u8) -> Self {
        let pixels = (width as usize) * (height as usize);
        let rgba = [level, level, level, 255].repeat(pixels);
        Self { width, height, rgba }
    }

    pub fn luma(&self) -> Option<f64> {
        mean_luma(&self.rgba)
    }
}

#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<Frame, SensorError>;
}

/// Frame source that always reports the same ambient level.
#[derive(Debug, Clone, Copy)]
pub struct FixedFrameSource {
    level: u8,
}

impl FixedFrameSource {
    pub fn new(luma: f64) -> Self {
        Self {
            level: luma.clamp(0.0, 255.0).round() as u8,
        }
    }
}

#[async_trait]
impl FrameSource for FixedFrameSource {
    async fn capture(&self) -> Result<Frame, SensorError> {
        Ok(Frame::uniform(16, 16, self.level))
    }
}
