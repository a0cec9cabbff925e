//! Deterministic stand-in for a webcam: renders gradient test frames with a
//! controllable mean brightness and a configurable warmup period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CaptureError;

use super::{CaptureConstraints, CaptureProvider, CaptureStream, Frame, FrameGrab};

const NOISE_SPAN: i32 = 8;
const GRADIENT_SPAN: i32 = 30;

#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    warmup_frames: u32,
    brightness: u8,
    seed: u64,
    fail_with: Option<CaptureError>,
    released: Arc<AtomicBool>,
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self {
            warmup_frames: 0,
            brightness: 128,
            seed: 0,
            fail_with: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of polls that report `NotReady` before frames start flowing.
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    /// Target mean luma of the generated frames.
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Every `acquire` fails with the given error.
    pub fn failing_with(mut self, error: CaptureError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Flag flipped when a stream acquired from this camera is released.
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureProvider for SyntheticCamera {
    type Stream = SyntheticStream;

    fn acquire(&self, constraints: &CaptureConstraints) -> Result<SyntheticStream, CaptureError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        self.released.store(false, Ordering::SeqCst);

        Ok(SyntheticStream {
            width: constraints.width.max(1),
            height: constraints.height.max(1),
            remaining_warmup: self.warmup_frames,
            brightness: self.brightness,
            frame_index: 0,
            rng: StdRng::seed_from_u64(self.seed),
            released: Arc::clone(&self.released),
        })
    }
}

#[derive(Debug)]
pub struct SyntheticStream {
    width: u32,
    height: u32,
    remaining_warmup: u32,
    brightness: u8,
    frame_index: u64,
    rng: StdRng,
    released: Arc<AtomicBool>,
}

impl CaptureStream for SyntheticStream {
    fn current_frame(&mut self) -> FrameGrab {
        if self.released.load(Ordering::SeqCst) {
            return FrameGrab::NotReady;
        }

        if self.remaining_warmup > 0 {
            self.remaining_warmup -= 1;
            return FrameGrab::NotReady;
        }

        let mut pixels = RgbaImage::new(self.width, self.height);
        let base = self.brightness as i32;
        for (x, _y, pixel) in pixels.enumerate_pixels_mut() {
            let gradient = (x as i32 * 2 * GRADIENT_SPAN) / self.width as i32 - GRADIENT_SPAN;
            let noise = self.rng.gen_range(-NOISE_SPAN..=NOISE_SPAN);
            let value = (base + gradient + noise).clamp(0, 255) as u8;
            *pixel = Rgba([value, value, value, 255]);
        }

        self.frame_index += 1;
        FrameGrab::Frame(Frame::new(pixels))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
