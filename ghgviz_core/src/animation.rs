// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount-triggered reveal animation.
//!
//! A [`RevealAnimator`] owns a single progress scalar that moves from `0` to `1` over a fixed
//! duration. It never owns the value being revealed: visuals derive their animated state from
//! [`RevealAnimator::eased`] (`value = target * eased`), so a donut sweep, its bars and a
//! counter can all share one animator.
//!
//! Lifecycle rules:
//! - at most one frame registration is held at any time;
//! - starting a new run cancels the held registration first;
//! - a delivered frame that does not match the held registration is ignored without touching
//!   state;
//! - [`RevealAnimator::unmount`] consumes the animator after cancelling its registration, so no
//!   frame can reach it afterwards.

use crate::config::EngineConfig;
use crate::scheduler::{FrameRequest, FrameScheduler};

/// Ease-out cubic: `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Scales `target` by eased progress.
pub fn reveal_value(target: f64, eased: f64) -> f64 {
    target * eased
}

/// Integer counter display: `floor(target * eased)`, exactly `target` once finished.
pub fn reveal_count(target: u64, eased: f64) -> u64 {
    if eased >= 1.0 {
        return target;
    }
    let v = target as f64 * eased.max(0.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "non-negative and bounded by `target`, truncation is the floor"
    )]
    {
        (v as u64).min(target)
    }
}

/// Snapshot of one animator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Linear progress in `[0, 1]`.
    pub progress: f64,
    /// Timestamp of the current run's start, if one was started.
    pub start_timestamp: Option<f64>,
    /// Whether a run is in flight.
    pub is_running: bool,
}

impl AnimationState {
    const IDLE: Self = Self {
        progress: 0.0,
        start_timestamp: None,
        is_running: false,
    };
}

/// Drives one reveal progress stream.
///
/// Tear it down with [`RevealAnimator::unmount`]: dropping it while a frame is pending leaves
/// that registration with the scheduler, where it fires into nothing.
#[derive(Debug)]
#[must_use = "an animator holds a frame registration that only `unmount` releases"]
pub struct RevealAnimator {
    duration_ms: f64,
    delay_ms: f64,
    state: AnimationState,
    pending: Option<FrameRequest>,
}

impl RevealAnimator {
    /// Creates an idle animator using the configured duration and delay.
    pub fn new(config: &EngineConfig) -> Self {
        let config = config.sanitized();
        Self {
            duration_ms: config.animation_duration_ms,
            delay_ms: config.animation_delay_ms,
            state: AnimationState::IDLE,
            pending: None,
        }
    }

    /// Creates an animator and starts its first run.
    pub fn mount(config: &EngineConfig, scheduler: &mut impl FrameScheduler, now_ms: f64) -> Self {
        let mut animator = Self::new(config);
        animator.start(scheduler, now_ms);
        animator
    }

    /// Starts a run from `0`, cancelling any run in flight.
    ///
    /// A retrigger never continues from the previous progress.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler, now_ms: f64) {
        self.release(scheduler);
        self.state = AnimationState {
            progress: 0.0,
            start_timestamp: Some(now_ms),
            is_running: true,
        };
        if self.duration_ms <= 0.0 && self.delay_ms <= 0.0 {
            self.finish();
            return;
        }
        self.pending = Some(scheduler.request_frame());
    }

    /// Handles a delivered frame.
    ///
    /// Returns the eased progress after the update, or `None` if `request` is not the
    /// registration this animator holds (stale or foreign frames never mutate state).
    pub fn on_frame(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        request: FrameRequest,
        now_ms: f64,
    ) -> Option<f64> {
        if self.pending != Some(request) {
            log::trace!("ignoring frame {} not held by this animator", request.get());
            return None;
        }
        self.pending = None;

        let start = self.state.start_timestamp.unwrap_or(now_ms);
        let elapsed = now_ms - start - self.delay_ms;
        let t = if self.duration_ms <= 0.0 {
            if elapsed >= 0.0 { 1.0 } else { 0.0 }
        } else {
            (elapsed / self.duration_ms).clamp(0.0, 1.0)
        };
        self.state.progress = self.state.progress.max(t);

        if self.state.progress >= 1.0 {
            self.finish();
        } else {
            self.pending = Some(scheduler.request_frame());
        }
        log::trace!("reveal progress {:.3}", self.state.progress);
        Some(self.eased())
    }

    /// Stops the current run where it is, releasing the frame registration.
    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        self.release(scheduler);
        self.state.is_running = false;
    }

    /// Tears the animator down, releasing its frame registration.
    pub fn unmount(mut self, scheduler: &mut impl FrameScheduler) {
        self.release(scheduler);
    }

    /// Current snapshot.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Eased progress in `[0, 1]`.
    pub fn eased(&self) -> f64 {
        ease_out_cubic(self.state.progress)
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Whether the last run reached `progress = 1`.
    pub fn is_finished(&self) -> bool {
        !self.state.is_running && self.state.progress >= 1.0
    }

    /// The frame registration currently held, if any.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Animated value for `target`.
    pub fn value(&self, target: f64) -> f64 {
        reveal_value(target, self.eased())
    }

    /// Animated sweep for a target sweep in degrees.
    pub fn sweep_deg(&self, target_sweep_deg: f64) -> f64 {
        reveal_value(target_sweep_deg, self.eased())
    }

    fn finish(&mut self) {
        self.state.progress = 1.0;
        self.state.is_running = false;
    }

    fn release(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(request) = self.pending.take() {
            log::trace!("cancelling frame {}", request.get());
            scheduler.cancel_frame(request);
        }
    }
}

impl Drop for RevealAnimator {
    fn drop(&mut self) {
        if let Some(request) = self.pending {
            log::warn!(
                "reveal animator dropped while holding frame {}; use `unmount` to release it",
                request.get()
            );
        }
    }
}

/// A reveal that restarts whenever its source changes.
///
/// `K` identifies the revealed data (a target value, a data version, a selected site). Setting
/// an equal source is a no-op; setting a different one restarts the run from `0`, whether or
/// not the previous run had finished.
#[derive(Debug)]
pub struct RevealOnChange<K> {
    source: Option<K>,
    animator: RevealAnimator,
}

impl<K: PartialEq> RevealOnChange<K> {
    /// Creates an idle reveal. The first [`RevealOnChange::set_source`] starts it.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            source: None,
            animator: RevealAnimator::new(config),
        }
    }

    /// Updates the source, restarting the run if it changed. Returns `true` on restart.
    pub fn set_source(
        &mut self,
        source: K,
        scheduler: &mut impl FrameScheduler,
        now_ms: f64,
    ) -> bool {
        if self.source.as_ref() == Some(&source) {
            return false;
        }
        self.source = Some(source);
        self.animator.start(scheduler, now_ms);
        true
    }

    /// Current source, if one was set.
    pub fn source(&self) -> Option<&K> {
        self.source.as_ref()
    }

    /// The underlying animator.
    pub fn animator(&self) -> &RevealAnimator {
        &self.animator
    }

    /// Forwards a delivered frame to the animator.
    pub fn on_frame(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        request: FrameRequest,
        now_ms: f64,
    ) -> Option<f64> {
        self.animator.on_frame(scheduler, request, now_ms)
    }

    /// Tears the reveal down, releasing its frame registration.
    pub fn unmount(self, scheduler: &mut impl FrameScheduler) {
        self.animator.unmount(scheduler);
    }
}
