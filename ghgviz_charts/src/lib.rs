// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart geometry for ghgviz series.
//!
//! This crate turns an [`AggregatedSeries`] into renderer-agnostic primitives:
//! - **Rings**: [`ArcLayoutSpec`] lays out donut segments, [`donut_wedge_path`] and
//!   [`progress_arc_path`] build their outlines.
//! - **Scales**: [`ScaleLinear`] and [`Scale`] with [`nice_ticks`] for value axes, and
//!   [`ScaleBand`] / [`ScalePoint`] for category slots.
//! - **Bars and strips**: [`BarChartSpec`] for grouped bars and [`ShareStrip`] for a 100 %
//!   stacked strip.
//! - **Lines**: [`LineChartSpec`] for several series over shared slots.
//! - **Formatting**: unit-scaled magnitudes, percentages and truncated labels.
//!
//! Every layout accepts an eased reveal progress in `[0, 1]`, typically
//! [`RevealAnimator::eased`], so one animator can drive every visual of a view.
//!
//! [`AggregatedSeries`]: ghgviz_core::AggregatedSeries
//! [`RevealAnimator::eased`]: ghgviz_core::RevealAnimator::eased

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod arc_layout;
mod bar_layout;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geometry;
mod line_layout;
mod scale;

pub use arc_layout::{ArcLayoutSpec, ArcSegment};
pub use bar_layout::{BarChartSpec, BarGroup, BarLayout, BarRect, ShareSegment, ShareStrip};
pub use format::{SHORT_LABEL_CHARS, UnitScale, coverage_percent, format_percent, short_label};
pub use geometry::{
    ArcPath, PathCommand, ProgressArc, SWEEP_EPSILON_DEG, donut_wedge_path, large_arc_flag,
    polar_to_cartesian, progress_arc_path,
};
pub use line_layout::{LineChartSpec, LineLayout, LinePath, LineSeries};
pub use scale::{Scale, ScaleBand, ScaleLinear, ScalePoint, nice_ticks};
