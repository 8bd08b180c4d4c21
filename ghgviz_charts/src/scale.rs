// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales for bar heights, line positions and category slots.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Affine map from a value interval onto an output interval.
///
/// Either interval may be reversed; a y axis usually maps `0` to the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Maps `domain.0` to `range.0` and `domain.1` to `range.1`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Output coordinate of `value`.
    ///
    /// When the domain is a single point every value lands in the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (lo, hi) = self.domain;
        let (out_lo, out_hi) = self.range;
        if hi == lo {
            return out_lo + (out_hi - out_lo) * 0.5;
        }
        out_lo + (value - lo) * (out_hi - out_lo) / (hi - lo)
    }

    /// Value interval.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output interval.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Axis ticks from zero.
///
/// The step is `max_value / (tick_count - 1)` rounded *up* to `{1, 2, 5} × 10^k`, so the last
/// tick is never below `max_value`. Non-positive or non-finite maxima are treated as `1`, and
/// fewer than two ticks as two.
pub fn nice_ticks(max_value: f64, tick_count: usize) -> Vec<f64> {
    let count = tick_count.max(2);
    let max = if max_value.is_finite() && max_value > 0.0 {
        max_value
    } else {
        1.0
    };
    let intervals = (count - 1) as f64;
    let step = nice_step_up(max, intervals);
    (0..count).map(|i| step * i as f64).collect()
}

/// The smallest `{1, 2, 5} × 10^k` step whose `intervals`-th multiple reaches `max`.
fn nice_step_up(max: f64, intervals: f64) -> f64 {
    // Absorbs `log10` and division rounding around exact bucket boundaries.
    const SLACK: f64 = 1e-9;
    const BUCKETS: [f64; 5] = [1.0, 2.0, 5.0, 10.0, 20.0];

    let raw = max / intervals;
    let power = raw.log10().floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "log10 of a finite positive f64 is within ±400"
    )]
    let base = 10_f64.powi(power as i32);
    let error = raw / base;
    let first = BUCKETS
        .iter()
        .position(|&b| error <= b + SLACK)
        .unwrap_or(BUCKETS.len() - 1);
    // The slack may pick a bucket just below `raw`; step up until the last tick covers `max`.
    BUCKETS[first..]
        .iter()
        .map(|&b| b * base)
        .find(|&step| step * intervals >= max)
        .unwrap_or(BUCKETS[BUCKETS.len() - 1] * base)
}

/// A linear value axis from zero with nice ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    /// Lower domain bound, always `0`.
    pub domain_min: f64,
    /// Upper domain bound, the last tick.
    pub domain_max: f64,
    /// Output coordinate of `domain_min`.
    pub range_min: f64,
    /// Output coordinate of `domain_max`.
    pub range_max: f64,
    /// Tick values, ascending from `0`.
    pub tick_values: Vec<f64>,
}

impl Scale {
    /// Builds a scale whose domain ends at the last nice tick at or above `max_value`.
    pub fn for_max(max_value: f64, range: (f64, f64), tick_count: usize) -> Self {
        let tick_values = nice_ticks(max_value, tick_count);
        let domain_max = tick_values.last().copied().unwrap_or(1.0);
        Self {
            domain_min: 0.0,
            domain_max,
            range_min: range.0,
            range_max: range.1,
            tick_values,
        }
    }

    /// The underlying linear mapping.
    pub fn linear(&self) -> ScaleLinear {
        ScaleLinear::new(
            (self.domain_min, self.domain_max),
            (self.range_min, self.range_max),
        )
    }

    /// Maps a value into range space.
    pub fn map(&self, value: f64) -> f64 {
        self.linear().map(value)
    }

    /// Ticks paired with their output coordinate.
    pub fn ticks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.tick_values.iter().map(|&v| (v, self.map(v)))
    }
}

/// Equal-width slots for categories, separated by padding.
///
/// Padding is measured in band widths: `inner` between neighbors, `outer` before the first and
/// after the last slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    origin: f64,
    extent: f64,
    count: usize,
    inner: f64,
    outer: f64,
}

impl ScaleBand {
    /// `count` slots across `range`, with a tenth of a band of padding everywhere.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            origin: range.0.min(range.1),
            extent: (range.1 - range.0).abs(),
            count,
            inner: 0.1,
            outer: 0.1,
        }
    }

    /// Replaces the padding; negative values count as `0`.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.inner = inner.max(0.0);
        self.outer = outer.max(0.0);
        self
    }

    /// Width of one slot, `0` without slots.
    pub fn band_width(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        self.extent / (n + self.inner * (n - 1.0) + 2.0 * self.outer)
    }

    /// Number of slots.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Left edge of slot `index`.
    pub fn x(&self, index: usize) -> f64 {
        let width = self.band_width();
        self.origin + width * (self.outer + (1.0 + self.inner) * index as f64)
    }

    /// Slot whose extent contains `x`. Padding belongs to no slot.
    pub fn index_at(&self, x: f64) -> Option<usize> {
        let width = self.band_width();
        (0..self.count).find(|&i| {
            let left = self.x(i);
            (left..left + width).contains(&x)
        })
    }
}

/// Evenly spaced positions for categories, e.g. the years of a line chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePoint {
    origin: f64,
    extent: f64,
    count: usize,
    padding: f64,
}

impl ScalePoint {
    /// `count` positions across `range`, half a step in from both ends.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            origin: range.0.min(range.1),
            extent: (range.1 - range.0).abs(),
            count,
            padding: 0.5,
        }
    }

    /// Replaces the outer padding, in steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Number of positions.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Position of `index`. A lone position sits in the middle.
    pub fn x(&self, index: usize) -> f64 {
        match self.count {
            0 => self.origin,
            1 => self.origin + self.extent * 0.5,
            n => {
                let step = self.extent / ((n - 1) as f64 + 2.0 * self.padding);
                self.origin + step * (self.padding + index as f64)
            }
        }
    }
}
