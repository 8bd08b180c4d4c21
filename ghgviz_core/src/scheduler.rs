// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling seam between the engine and its host.
//!
//! The engine never owns a clock or a timer. Hosts (a browser `requestAnimationFrame` bridge, a
//! windowing event loop, a test) hand out one-shot [`FrameRequest`]s and later deliver them back
//! together with a monotonic timestamp.

use smallvec::SmallVec;

/// Identity of one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(u64);

impl FrameRequest {
    /// Creates a request id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Something that can deliver one-shot frame callbacks.
pub trait FrameScheduler {
    /// Registers interest in the next frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a registration. Cancelling an already delivered request is a no-op.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// A deterministic scheduler that advances time in fixed steps.
///
/// Each [`StepScheduler::advance`] moves the clock forward by one frame interval and returns
/// every request registered since the previous step. Requests are one-shot, like
/// `requestAnimationFrame`.
#[derive(Clone, Debug)]
pub struct StepScheduler {
    now_ms: f64,
    frame_interval_ms: f64,
    next_id: u64,
    pending: SmallVec<[FrameRequest; 4]>,
    cancelled: u64,
}

impl StepScheduler {
    /// Creates a scheduler starting at `t = 0` with the given frame interval.
    pub fn new(frame_interval_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_interval_ms,
            next_id: 1,
            pending: SmallVec::new(),
            cancelled: 0,
        }
    }

    /// Current timestamp in milliseconds.
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Requests that are registered and not yet delivered.
    pub fn pending(&self) -> &[FrameRequest] {
        &self.pending
    }

    /// Number of successful cancellations so far.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Advances one frame and takes the due requests.
    pub fn advance(&mut self) -> (f64, SmallVec<[FrameRequest; 4]>) {
        self.now_ms += self.frame_interval_ms;
        (self.now_ms, core::mem::take(&mut self.pending))
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl FrameScheduler for StepScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Some(pos) = self.pending.iter().position(|&r| r == request) {
            self.pending.remove(pos);
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn requests_are_one_shot() {
        let mut s = StepScheduler::new(10.0);
        let a = s.request_frame();
        let (now, due) = s.advance();
        assert_eq!(now, 10.0);
        assert_eq!(&due[..], &[a]);
        let (_, due) = s.advance();
        assert!(due.is_empty(), "a delivered request must not fire twice");
    }

    #[test]
    fn cancelled_requests_are_never_delivered() {
        let mut s = StepScheduler::default();
        let a = s.request_frame();
        let b = s.request_frame();
        s.cancel_frame(a);
        s.cancel_frame(a);
        assert_eq!(s.cancelled(), 1);
        let (_, due) = s.advance();
        assert_eq!(&due[..], &[b]);
    }
}
