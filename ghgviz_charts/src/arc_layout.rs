// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring (donut) layout.
//!
//! Items are laid out clockwise from `start_deg` in series order. Each item gets
//! `value / total × 360°`, minus a fixed gap split evenly on both sides. A single segment gets
//! no gap so it closes into a full ring.

use alloc::vec::Vec;

use ghgviz_core::{AggregatedSeries, Palette};
use kurbo::Point;
use peniko::Color;

use crate::geometry::{ArcPath, SWEEP_EPSILON_DEG, donut_wedge_path};

/// One laid-out ring segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment<'a> {
    /// Key of the source item.
    pub key: &'a str,
    /// Index of the source item in the series.
    pub index: usize,
    /// Start angle in degrees (0° up, clockwise).
    pub start_deg: f64,
    /// End angle in degrees.
    pub end_deg: f64,
    /// Inner radius.
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Palette token of the source item.
    pub color_token: &'a str,
}

impl ArcSegment<'_> {
    /// Angular extent in degrees.
    pub fn sweep_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// Angle halfway through the segment, e.g. for label placement.
    pub fn mid_deg(&self) -> f64 {
        (self.start_deg + self.end_deg) * 0.5
    }

    /// Closed wedge path around `center`.
    pub fn path(&self, center: Point) -> Option<ArcPath> {
        donut_wedge_path(
            center,
            self.outer_radius,
            self.inner_radius,
            self.start_deg,
            self.end_deg,
        )
    }

    /// Fill color from `palette`.
    pub fn fill(&self, palette: &Palette) -> Color {
        palette.color(self.color_token)
    }

    /// Whether `angle_deg` (already normalized to the layout's turn) falls in this segment.
    fn contains_angle(&self, angle_deg: f64) -> bool {
        angle_deg >= self.start_deg && angle_deg < self.end_deg
    }
}

/// Geometry of a ring chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcLayoutSpec {
    /// Ring center.
    pub center: Point,
    /// Outer radius.
    pub outer_radius: f64,
    /// Inner radius, `0` for a pie.
    pub inner_radius: f64,
    /// Gap between neighboring segments, in degrees.
    pub gap_deg: f64,
    /// Angle of the first segment's leading edge.
    pub start_deg: f64,
}

impl ArcLayoutSpec {
    /// Default gap between segments.
    pub const DEFAULT_GAP_DEG: f64 = 1.5;

    /// Creates a ring spec with the default gap, starting at 12 o'clock.
    pub fn new(center: Point, outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            center,
            outer_radius,
            inner_radius,
            gap_deg: Self::DEFAULT_GAP_DEG,
            start_deg: 0.0,
        }
    }

    /// Sets the gap between segments.
    pub fn with_gap_deg(mut self, gap_deg: f64) -> Self {
        self.gap_deg = if gap_deg.is_finite() {
            gap_deg.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// Sets the start angle.
    pub fn with_start_deg(mut self, start_deg: f64) -> Self {
        self.start_deg = start_deg;
        self
    }

    /// Lays out `series`.
    ///
    /// Returns no segments in the "no data" state. Segments whose sweep after gap subtraction
    /// is negligible are omitted; the remaining segments keep their series index.
    pub fn layout<'a>(&self, series: &'a AggregatedSeries) -> Vec<ArcSegment<'a>> {
        if !series.has_data() {
            return Vec::new();
        }
        let total = series.total();
        let present = series.items().iter().filter(|i| i.value > 0.0).count();
        let gap = if present > 1 { self.gap_deg } else { 0.0 };

        let mut cursor = self.start_deg;
        let mut out = Vec::with_capacity(present);
        for (index, item) in series.items().iter().enumerate() {
            let share = item.value / total * 360.0;
            let start = cursor + gap * 0.5;
            let end = cursor + share - gap * 0.5;
            cursor += share;
            if end - start <= SWEEP_EPSILON_DEG {
                log::trace!("segment {:?} too narrow for the gap, skipped", item.key);
                continue;
            }
            out.push(ArcSegment {
                key: &item.key,
                index,
                start_deg: start,
                end_deg: end,
                inner_radius: self.inner_radius,
                outer_radius: self.outer_radius,
                color_token: &item.color_token,
            });
        }
        out
    }

    /// Clips `segments` to the first `eased` fraction of the turn.
    ///
    /// The ring grows clockwise from `start_deg`; segments that start past the reveal front
    /// are dropped.
    pub fn reveal<'a>(&self, segments: &[ArcSegment<'a>], eased: f64) -> Vec<ArcSegment<'a>> {
        let front = self.start_deg + 360.0 * eased.clamp(0.0, 1.0);
        segments
            .iter()
            .filter(|s| s.start_deg < front)
            .map(|s| ArcSegment {
                end_deg: s.end_deg.min(front),
                ..*s
            })
            .collect()
    }

    /// Finds the segment under `point`.
    ///
    /// The point must lie within the annulus between the inner and outer radius.
    pub fn segment_at<'s, 'a>(
        &self,
        segments: &'s [ArcSegment<'a>],
        point: Point,
    ) -> Option<&'s ArcSegment<'a>> {
        let v = point - self.center;
        let r = v.hypot();
        if r < self.inner_radius || r > self.outer_radius {
            return None;
        }
        // `atan2` measures from +x counter-clockwise in y-up terms; on screen (y down) it runs
        // clockwise, so shifting by 90° puts 0° at 12 o'clock.
        let screen_deg = v.atan2().to_degrees() + 90.0;
        let mut offset = (screen_deg - self.start_deg) % 360.0;
        if offset < 0.0 {
            offset += 360.0;
        }
        let angle = self.start_deg + offset;
        segments.iter().find(|s| s.contains_angle(angle))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use ghgviz_core::SeriesItem;

    use super::*;
    use crate::geometry::polar_to_cartesian;

    fn series(values: &[f64]) -> AggregatedSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesItem::new(alloc::format!("k{i}"), "c", v))
            .collect()
    }

    fn spec() -> ArcLayoutSpec {
        ArcLayoutSpec::new(Point::new(100.0, 100.0), 80.0, 50.0).with_gap_deg(2.0)
    }

    #[test]
    fn sweeps_sum_to_a_turn_minus_gaps() {
        let s = series(&[30.0, 10.0, 50.0, 10.0]);
        let segs = spec().layout(&s);
        assert_eq!(segs.len(), 4);
        let sum: f64 = segs.iter().map(ArcSegment::sweep_deg).sum();
        assert!((sum - (360.0 - 4.0 * 2.0)).abs() < 1e-9, "sum {sum}");
        assert!((segs[0].sweep_deg() - (108.0 - 2.0)).abs() < 1e-9);
        assert_eq!(segs[0].start_deg, 1.0);
    }

    #[test]
    fn single_segment_has_no_gap() {
        let s = series(&[42.0]);
        let segs = spec().layout(&s);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].start_deg, 0.0);
        assert_eq!(segs[0].end_deg, 360.0);
        assert!(segs[0].path(spec().center).is_some());
    }

    #[test]
    fn no_data_has_no_segments() {
        assert!(spec().layout(&AggregatedSeries::empty()).is_empty());
    }

    #[test]
    fn slivers_narrower_than_the_gap_are_skipped() {
        let s = series(&[1000.0, 1.0, 1000.0]);
        let segs = spec().with_gap_deg(5.0).layout(&s);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].index, 2, "skipped segments keep later indices stable");
    }

    #[test]
    fn reveal_clips_at_the_front() {
        let s = series(&[50.0, 50.0]);
        let sp = spec().with_gap_deg(0.0);
        let segs = sp.layout(&s);
        let half = sp.reveal(&segs, 0.25);
        assert_eq!(half.len(), 1);
        assert_eq!(half[0].end_deg, 90.0);
        assert_eq!(sp.reveal(&segs, 1.0), segs);
        assert!(sp.reveal(&segs, 0.0).is_empty());
    }

    #[test]
    fn hit_testing_inverts_the_polar_mapping() {
        let s = series(&[25.0, 25.0, 50.0]);
        let sp = spec();
        let segs = sp.layout(&s);
        for seg in &segs {
            let p = polar_to_cartesian(sp.center, 65.0, seg.mid_deg());
            assert_eq!(sp.segment_at(&segs, p).map(|s| s.key), Some(seg.key));
        }
        assert!(sp.segment_at(&segs, sp.center).is_none(), "hole");
        assert!(sp.segment_at(&segs, Point::new(100.0, 5.0)).is_none(), "outside");
        let gap = polar_to_cartesian(sp.center, 65.0, 0.0);
        assert!(sp.segment_at(&segs, gap).is_none(), "gaps are not hoverable");
    }

    #[test]
    fn hit_testing_respects_a_rotated_start() {
        let s = AggregatedSeries::new(vec![
            SeriesItem::new("a", "c", 1.0),
            SeriesItem::new("b", "c", 3.0),
        ]);
        let sp = spec().with_gap_deg(0.0).with_start_deg(-90.0);
        let segs = sp.layout(&s);
        // `a` covers -90..0, i.e. the upper-left quadrant.
        let p = polar_to_cartesian(sp.center, 65.0, 315.0);
        assert_eq!(sp.segment_at(&segs, p).map(|s| s.key), Some("a"));
    }
}
