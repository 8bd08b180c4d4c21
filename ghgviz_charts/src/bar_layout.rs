// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bar and share strip layout.

use alloc::vec::Vec;

use ghgviz_core::{AggregatedSeries, Palette};
use kurbo::{Point, Rect};
use peniko::Color;
use smallvec::SmallVec;

use crate::scale::{Scale, ScaleBand};

/// One category slot with one value per bar series.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGroup<'a> {
    /// Key of the slot.
    pub key: &'a str,
    /// One value per series, in series order.
    pub values: SmallVec<[f64; 2]>,
}

impl<'a> BarGroup<'a> {
    /// Creates a group.
    pub fn new(key: &'a str, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            key,
            values: values.into_iter().collect(),
        }
    }

    /// One single-bar group per series item.
    pub fn from_series(series: &'a AggregatedSeries) -> Vec<Self> {
        series
            .items()
            .iter()
            .map(|i| Self::new(&i.key, [i.value]))
            .collect()
    }
}

/// One laid-out bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect<'a> {
    /// Key of the group.
    pub key: &'a str,
    /// Group index.
    pub group: usize,
    /// Series index within the group.
    pub series: usize,
    /// Source value.
    pub value: f64,
    /// Bar geometry, bottom-aligned on the baseline.
    pub rect: Rect,
}

/// Result of a bar layout.
#[derive(Clone, Debug, PartialEq)]
pub struct BarLayout<'a> {
    /// Bars in group order, then series order.
    pub bars: Vec<BarRect<'a>>,
    /// Value axis.
    pub scale: Scale,
    /// Category slots.
    pub bands: ScaleBand,
}

impl<'a> BarLayout<'a> {
    /// Finds the bar containing `point`.
    pub fn bar_at(&self, point: Point) -> Option<&BarRect<'a>> {
        self.bars.iter().find(|b| b.rect.contains(point))
    }
}

/// Vertical grouped bar chart geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarChartSpec {
    /// Plot area; bars grow up from `plot.y1`.
    pub plot: Rect,
    /// Band padding between groups, in band units.
    pub padding_inner: f64,
    /// Band padding at both ends, in band units.
    pub padding_outer: f64,
    /// Horizontal gap between bars of one group.
    pub bar_gap: f64,
    /// Smallest visible height of a non-zero bar, as a fraction of the plot height.
    pub min_height_ratio: f64,
    /// Number of axis ticks.
    pub tick_count: usize,
}

impl BarChartSpec {
    /// Creates a spec with a 2 % minimum bar height and five ticks.
    pub fn new(plot: Rect) -> Self {
        Self {
            plot,
            padding_inner: 0.3,
            padding_outer: 0.15,
            bar_gap: 6.0,
            min_height_ratio: 0.02,
            tick_count: ghgviz_core::DEFAULT_TICK_COUNT,
        }
    }

    /// Sets the number of axis ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the gap between bars of one group.
    pub fn with_bar_gap(mut self, bar_gap: f64) -> Self {
        self.bar_gap = bar_gap.max(0.0);
        self
    }

    /// Lays out `groups`, with every bar height scaled by `eased` reveal progress.
    pub fn layout<'a>(&self, groups: &[BarGroup<'a>], eased: f64) -> BarLayout<'a> {
        let max = groups
            .iter()
            .flat_map(|g| g.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        let scale = Scale::for_max(max, (self.plot.y1, self.plot.y0), self.tick_count);
        let bands = ScaleBand::new((self.plot.x0, self.plot.x1), groups.len())
            .with_padding(self.padding_inner, self.padding_outer);

        let eased = eased.clamp(0.0, 1.0);
        let plot_height = self.plot.height();
        let min_height = plot_height * self.min_height_ratio;
        let band_width = bands.band_width();

        let mut bars = Vec::new();
        for (gi, group) in groups.iter().enumerate() {
            let k = group.values.len();
            if k == 0 {
                continue;
            }
            let gaps = self.bar_gap * (k - 1) as f64;
            let bar_width = ((band_width - gaps) / k as f64).max(0.0);
            let x0 = bands.x(gi);
            for (si, &value) in group.values.iter().enumerate() {
                let full = if value.is_finite() && value > 0.0 {
                    (value / scale.domain_max * plot_height).max(min_height)
                } else {
                    0.0
                };
                let h = full * eased;
                let x = x0 + si as f64 * (bar_width + self.bar_gap);
                bars.push(BarRect {
                    key: group.key,
                    group: gi,
                    series: si,
                    value,
                    rect: Rect::new(x, self.plot.y1 - h, x + bar_width, self.plot.y1),
                });
            }
        }
        BarLayout {
            bars,
            scale,
            bands,
        }
    }
}

/// One segment of a share strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShareSegment<'a> {
    /// Key of the source item.
    pub key: &'a str,
    /// Palette token of the source item.
    pub color_token: &'a str,
    /// Share of the total, in percent.
    pub percent: f64,
    /// Segment geometry.
    pub rect: Rect,
}

impl ShareSegment<'_> {
    /// Fill color from `palette`.
    pub fn fill(&self, palette: &Palette) -> Color {
        palette.color(self.color_token)
    }
}

/// A horizontal 100 % stacked strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShareStrip {
    /// Strip bounds.
    pub bounds: Rect,
}

impl ShareStrip {
    /// Creates a strip filling `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Lays out `series` left to right, widths scaled by `eased`.
    ///
    /// Returns no segments in the "no data" state.
    pub fn layout<'a>(&self, series: &'a AggregatedSeries, eased: f64) -> Vec<ShareSegment<'a>> {
        if !series.has_data() {
            return Vec::new();
        }
        let eased = eased.clamp(0.0, 1.0);
        let total = series.total();
        let width = self.bounds.width();
        let mut x = self.bounds.x0;
        series
            .items()
            .iter()
            .map(|item| {
                let w = item.value / total * width * eased;
                let rect = Rect::new(x, self.bounds.y0, x + w, self.bounds.y1);
                x += w;
                ShareSegment {
                    key: &item.key,
                    color_token: &item.color_token,
                    percent: item.value / total * 100.0,
                    rect,
                }
            })
            .collect()
    }
}
