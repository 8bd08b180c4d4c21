// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-series line layout over shared x slots.

use alloc::string::String;
use alloc::vec::Vec;

use ghgviz_core::Palette;
use kurbo::{BezPath, Point, Rect};
use peniko::Color;

use crate::scale::{Scale, ScalePoint};

/// One named value sequence. Index `i` belongs to x slot `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSeries {
    /// Series key.
    pub key: String,
    /// Palette token.
    pub color_token: String,
    /// Values; non-finite entries are plotted as `0`.
    pub values: Vec<f64>,
}

impl LineSeries {
    /// Creates a series whose color token is its key.
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let key = key.into();
        Self {
            color_token: key.clone(),
            key,
            values: values.into_iter().collect(),
        }
    }

    /// Sets the palette token.
    pub fn with_color_token(mut self, token: impl Into<String>) -> Self {
        self.color_token = token.into();
        self
    }
}

fn plotted(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// A laid-out polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePath<'a> {
    /// Series key.
    pub key: &'a str,
    /// Palette token.
    pub color_token: &'a str,
    /// Vertices in x order.
    pub points: Vec<Point>,
}

impl LinePath<'_> {
    /// The polyline as a [`BezPath`].
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(&first) = points.next() {
            path.move_to(first);
            for &p in points {
                path.line_to(p);
            }
        }
        path
    }

    /// Stroke color from `palette`.
    pub fn stroke(&self, palette: &Palette) -> Color {
        palette.color(self.color_token)
    }
}

/// Result of a line layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout<'a> {
    /// One path per input series.
    pub paths: Vec<LinePath<'a>>,
    /// Shared value axis.
    pub scale: Scale,
    /// Shared x slots.
    pub x: ScalePoint,
}

/// Line chart geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineChartSpec {
    /// Plot area; the baseline is `plot.y1`.
    pub plot: Rect,
    /// Outer padding of the x slots, in slot steps.
    pub padding: f64,
    /// Number of axis ticks.
    pub tick_count: usize,
}

impl LineChartSpec {
    /// Creates a spec with half-step outer padding and five ticks.
    pub fn new(plot: Rect) -> Self {
        Self {
            plot,
            padding: 0.5,
            tick_count: ghgviz_core::DEFAULT_TICK_COUNT,
        }
    }

    /// Sets the number of axis ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Lays out all series against one shared nice scale.
    ///
    /// During a reveal every point is pulled toward the baseline by `1 - eased`.
    pub fn layout<'a>(&self, series: &'a [LineSeries], eased: f64) -> LineLayout<'a> {
        let slots = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        let max = series
            .iter()
            .flat_map(|s| s.values.iter().copied().map(plotted))
            .fold(0.0, f64::max);
        let scale = Scale::for_max(max, (self.plot.y1, self.plot.y0), self.tick_count);
        let x = ScalePoint::new((self.plot.x0, self.plot.x1), slots).with_padding(self.padding);
        let eased = eased.clamp(0.0, 1.0);

        let paths = series
            .iter()
            .map(|s| LinePath {
                key: &s.key,
                color_token: &s.color_token,
                points: s
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Point::new(x.x(i), scale.map(plotted(v) * eased)))
                    .collect(),
            })
            .collect();
        LineLayout { paths, scale, x }
    }
}
