//! Capture-device seam: the loop owns a stream handle obtained from a
//! provider and is the only component allowed to open or release it.

pub mod synthetic;

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

pub use synthetic::SyntheticCamera;

/// Requested video geometry, the analog of a getUserMedia constraint set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// One captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixels: RgbaImage,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            captured_at: Utc::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Result of polling a stream for its latest frame. `NotReady` covers
/// device warmup and is a silent skip, not an error.
#[derive(Debug)]
pub enum FrameGrab {
    Frame(Frame),
    NotReady,
}

/// Opens capture streams. `acquire` may block on a permission prompt, so the
/// loop always calls it from a blocking worker thread.
pub trait CaptureProvider: Send + Sync + 'static {
    type Stream: CaptureStream;

    fn acquire(&self, constraints: &CaptureConstraints) -> Result<Self::Stream, CaptureError>;
}

/// An open frame source. `release` must be idempotent; after it returns the
/// underlying device is off and `current_frame` reports `NotReady`.
pub trait CaptureStream: Send + 'static {
    fn current_frame(&mut self) -> FrameGrab;

    fn release(&mut self);
}
