// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core model and runtime state for the ghgviz chart engine.
//!
//! This crate holds everything that is not geometry:
//! - **Series model**: [`SeriesItem`] and [`AggregatedSeries`], including the "no data" state.
//! - **Palette**: an explicit color-token table handed to each chart instance.
//! - **Configuration**: [`EngineConfig`] with lenient fallbacks for invalid values.
//! - **Interaction**: hover and category-filter state plus tooltip derivation.
//! - **Reveal animation**: an eased progress stream driven by host frames, with explicit
//!   start/cancel/unmount lifecycle.
//!
//! The runtime is single-threaded and cooperative. Nothing here blocks or performs I/O; the host
//! delivers pointer events and frame callbacks and reads back derived state.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod animation;
mod config;
mod interaction;
mod model;
mod palette;
mod scheduler;

pub use animation::{
    AnimationState, RevealAnimator, RevealOnChange, ease_out_cubic, reveal_count, reveal_value,
};
pub use config::{
    DEFAULT_ANIMATION_DURATION_MS, DEFAULT_TICK_COUNT, EngineConfig, ParseSortModeError,
    ParseTopNError, SortMode, TopN,
};
pub use interaction::{
    Emphasis, HoverState, InteractionEvent, InteractionState, TOOLTIP_OFFSET, Tooltip,
    tooltip_for,
};
pub use model::{AggregatedSeries, SeriesItem};
pub use palette::{Palette, PaletteError};
pub use scheduler::{FrameRequest, FrameScheduler, StepScheduler};
