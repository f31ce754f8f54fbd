//! Camera capture thread
//!
//! Frame grabbing and classification run off the simulation thread. The
//! controller publishes only the most recent sample; the game loop polls it
//! once per tick and never blocks on the camera.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::classify::{self, GestureSample};
use super::frame::{self, Frame, SkinRange};

/// Camera failures surfaced by a [`FrameSource`]
#[derive(Debug)]
pub enum CameraError {
    /// Device missing or disconnected mid-session
    Disconnected,
    /// Transient grab failure; the frame is skipped
    Grab(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Disconnected => write!(f, "camera disconnected"),
            CameraError::Grab(msg) => write!(f, "frame grab failed: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Anything that can produce camera frames. The game core stays testable by
/// swapping in synthetic sources.
pub trait FrameSource: Send {
    fn grab(&mut self) -> Result<Frame, CameraError>;
}

/// Owns the capture thread and the latest classification
pub struct GestureController {
    latest: Arc<Mutex<GestureSample>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl GestureController {
    /// Spawn the capture loop over `source`
    pub fn start(mut source: Box<dyn FrameSource>, range: SkinRange) -> Self {
        let latest = Arc::new(Mutex::new(GestureSample::none()));
        let stop = Arc::new(AtomicBool::new(false));

        let slot = Arc::clone(&latest);
        let stop_flag = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("gesture-capture".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match source.grab() {
                        Ok(mut raw) => {
                            raw.mirror();
                            let mask = frame::segment(&raw, &range);
                            let sample = classify::classify(&mask);
                            if let Ok(mut slot) = slot.lock() {
                                *slot = sample;
                            }
                        }
                        Err(CameraError::Disconnected) => {
                            log::warn!("camera disconnected, stopping capture");
                            break;
                        }
                        Err(err) => {
                            // Skip the frame, keep the last good sample
                            log::debug!("{err}");
                            thread::sleep(Duration::from_millis(50));
                        }
                    }
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("gesture thread failed to start: {err}");
                None
            }
        };
        Self {
            latest,
            stop,
            worker,
        }
    }

    /// The most recent classification, last write wins
    pub fn latest(&self) -> GestureSample {
        self.latest
            .lock()
            .map(|s| *s)
            .unwrap_or_else(|_| GestureSample::none())
    }

    /// Signal the capture loop and join it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for GestureController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emits a few solid-blue frames (nothing skin-toned), then runs dry
    struct SolidSource {
        frames: u32,
    }

    impl FrameSource for SolidSource {
        fn grab(&mut self) -> Result<Frame, CameraError> {
            if self.frames == 0 {
                return Err(CameraError::Disconnected);
            }
            self.frames -= 1;
            let mut frame = Frame::new(64, 64);
            for y in 0..64 {
                for x in 0..64 {
                    frame.set_pixel(x, y, [0, 0, 255]);
                }
            }
            Ok(frame)
        }
    }

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn grab(&mut self) -> Result<Frame, CameraError> {
            Err(CameraError::Disconnected)
        }
    }

    #[test]
    fn test_controller_publishes_samples_and_joins() {
        let mut controller = GestureController::start(
            Box::new(SolidSource { frames: 3 }),
            SkinRange::default(),
        );
        // The source runs dry and the worker exits on its own; stop() must
        // still join cleanly
        controller.stop();
        let sample = controller.latest();
        assert_eq!(sample.confidence, 0.0);
        assert!(sample.centroid.is_none());
    }

    #[test]
    fn test_disconnected_source_stops_worker() {
        let mut controller =
            GestureController::start(Box::new(FailingSource), SkinRange::default());
        controller.stop();
        assert!(controller.worker.is_none());
    }
}
