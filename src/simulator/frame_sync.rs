use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::constants::FRAME_WAIT_SLICE_MS;

/// One-slot frame barrier between the simulation loop and a frontend.
///
/// The loop publishes a rendered frame and blocks until the frontend
/// acknowledges having consumed it, so the renderer is never touched
/// from both sides at once. The wait re-checks a stop flag on a short
/// period; raising the flag releases the loop even when no
/// acknowledgement will ever come.
#[derive(Debug, Default)]
pub struct FrameSync {
    pending: Mutex<bool>,
    acked: Condvar,
    stopping: AtomicBool,
}

impl FrameSync {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            acked: Condvar::new(),
            stopping: AtomicBool::new(false),
        }
    }

    /// Marks a frame as waiting for acknowledgement.
    pub fn publish(&self) {
        *self.pending.lock().unwrap() = true;
    }

    /// Consumes the pending frame and releases the simulation loop.
    pub fn acknowledge(&self) {
        let mut pending = self.pending.lock().unwrap();
        *pending = false;
        self.acked.notify_all();
    }

    /// Raised once at shutdown; every current and future wait returns.
    pub fn raise_stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.acked.notify_all();
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    /// Blocks until the pending frame is acknowledged or the stop flag
    /// is raised. Returns immediately when no frame is pending.
    pub fn wait_acknowledged(&self) {
        let mut pending = self.pending.lock().unwrap();
        while *pending && !self.is_stopping() {
            let (guard, _) = self
                .acked
                .wait_timeout(pending, Duration::from_millis(FRAME_WAIT_SLICE_MS))
                .unwrap();
            pending = guard;
        }
    }
}
