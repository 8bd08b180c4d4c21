// Copyright 2025 the ghgviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar geometry and arc paths.
//!
//! Angles are in degrees, with 0° at 12 o'clock and sweeps running clockwise in screen space
//! (y down). Paths are kept as a small command list so they can be emitted either as SVG path
//! data or as a [`BezPath`] for a renderer.

use alloc::format;
use alloc::string::String;

use kurbo::{Arc, BezPath, Point, SvgArc, Vec2};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Sweeps at or below this many degrees produce no geometry.
pub const SWEEP_EPSILON_DEG: f64 = 1e-3;

/// Tolerance used when flattening arcs into cubic Béziers.
const ARC_TOLERANCE: f64 = 0.1;

/// Maps an angle (0° up, clockwise) and radius to a point.
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    let a = (angle_deg - 90.0).to_radians();
    Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
}

/// Whether an SVG arc spanning `sweep_deg` needs the large-arc flag.
///
/// Exactly 180° is drawn as a small arc.
pub fn large_arc_flag(sweep_deg: f64) -> bool {
    sweep_deg > 180.0
}

/// One path command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a subpath.
    MoveTo(Point),
    /// Straight segment.
    LineTo(Point),
    /// Circular arc from the current point.
    ArcTo {
        /// Arc radius.
        radius: f64,
        /// SVG large-arc flag.
        large_arc: bool,
        /// SVG sweep flag; `true` is clockwise on screen.
        clockwise: bool,
        /// End point.
        to: Point,
    },
    /// Close the subpath.
    Close,
}

/// A path made of lines and circular arcs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArcPath {
    commands: SmallVec<[PathCommand; 8]>,
}

impl ArcPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands in drawing order.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Whether the path has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Appends an arc around `center` from `from_deg` to `to_deg`, starting at the current
    /// point. Full turns are split into two half arcs, since a single SVG arc cannot close on
    /// itself.
    fn arc(&mut self, center: Point, radius: f64, from_deg: f64, to_deg: f64) {
        let sweep = to_deg - from_deg;
        let clockwise = sweep > 0.0;
        if sweep.abs() >= 360.0 - SWEEP_EPSILON_DEG {
            let half = if clockwise { 180.0 } else { -180.0 };
            for offset in [half, 2.0 * half] {
                self.push(PathCommand::ArcTo {
                    radius,
                    large_arc: false,
                    clockwise,
                    to: polar_to_cartesian(center, radius, from_deg + offset),
                });
            }
        } else {
            self.push(PathCommand::ArcTo {
                radius,
                large_arc: large_arc_flag(sweep.abs()),
                clockwise,
                to: polar_to_cartesian(center, radius, to_deg),
            });
        }
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for (i, c) in self.commands.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            match *c {
                PathCommand::MoveTo(p) => d.push_str(&format!("M{:.3} {:.3}", p.x, p.y)),
                PathCommand::LineTo(p) => d.push_str(&format!("L{:.3} {:.3}", p.x, p.y)),
                PathCommand::ArcTo {
                    radius,
                    large_arc,
                    clockwise,
                    to,
                } => d.push_str(&format!(
                    "A{radius:.3} {radius:.3} 0 {} {} {:.3} {:.3}",
                    u8::from(large_arc),
                    u8::from(clockwise),
                    to.x,
                    to.y
                )),
                PathCommand::Close => d.push('Z'),
            }
        }
        d
    }

    /// Converts to a [`BezPath`], approximating arcs with cubic Béziers.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut current = Point::ZERO;
        let mut subpath_start = Point::ZERO;
        for c in &self.commands {
            match *c {
                PathCommand::MoveTo(p) => {
                    path.move_to(p);
                    current = p;
                    subpath_start = p;
                }
                PathCommand::LineTo(p) => {
                    path.line_to(p);
                    current = p;
                }
                PathCommand::ArcTo {
                    radius,
                    large_arc,
                    clockwise,
                    to,
                } => {
                    let svg = SvgArc {
                        from: current,
                        to,
                        radii: Vec2::new(radius, radius),
                        x_rotation: 0.0,
                        large_arc,
                        sweep: clockwise,
                    };
                    match Arc::from_svg_arc(&svg) {
                        Some(arc) => path.extend(arc.append_iter(ARC_TOLERANCE)),
                        None => path.line_to(to),
                    }
                    current = to;
                }
                PathCommand::Close => {
                    path.close_path();
                    current = subpath_start;
                }
            }
        }
        path
    }
}

/// Builds a closed annular wedge between `start_deg` and `end_deg`.
///
/// The outer arc is traced start to end, then the inner arc end to start. With
/// `inner_radius <= 0` the wedge is a pie slice through the center. Returns `None` when the
/// sweep is at or below [`SWEEP_EPSILON_DEG`].
pub fn donut_wedge_path(
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    start_deg: f64,
    end_deg: f64,
) -> Option<ArcPath> {
    let sweep = end_deg - start_deg;
    if !(sweep > SWEEP_EPSILON_DEG && outer_radius > 0.0) {
        log::trace!("skipping degenerate wedge {start_deg}..{end_deg}");
        return None;
    }
    let end_deg = start_deg + sweep.min(360.0);
    let full = sweep >= 360.0 - SWEEP_EPSILON_DEG;
    let has_hole = inner_radius > 0.0;

    let mut path = ArcPath::new();
    path.push(PathCommand::MoveTo(polar_to_cartesian(
        center,
        outer_radius,
        start_deg,
    )));
    path.arc(center, outer_radius, start_deg, end_deg);
    match (full, has_hole) {
        (true, true) => {
            path.push(PathCommand::Close);
            path.push(PathCommand::MoveTo(polar_to_cartesian(
                center,
                inner_radius,
                end_deg,
            )));
            path.arc(center, inner_radius, end_deg, start_deg);
        }
        (true, false) => {}
        (false, true) => {
            path.push(PathCommand::LineTo(polar_to_cartesian(
                center,
                inner_radius,
                end_deg,
            )));
            path.arc(center, inner_radius, end_deg, start_deg);
        }
        (false, false) => path.push(PathCommand::LineTo(center)),
    }
    path.push(PathCommand::Close);
    Some(path)
}

/// A circular progress indicator: a stroked arc from 12 o'clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressArc {
    /// Ring center.
    pub center: Point,
    /// Radius of the stroke centerline.
    pub radius: f64,
    /// Stroke width of both track and indicator.
    pub stroke_width: f64,
    /// Percentage after clamping to `[0, 100]`.
    pub percent: f64,
    /// Indicator sweep in degrees.
    pub sweep_deg: f64,
    /// Open indicator path, `None` at 0 %.
    pub path: Option<ArcPath>,
}

impl ProgressArc {
    /// Full-circle background track.
    pub fn track_path(&self) -> ArcPath {
        let mut path = ArcPath::new();
        path.push(PathCommand::MoveTo(polar_to_cartesian(
            self.center,
            self.radius,
            0.0,
        )));
        path.arc(self.center, self.radius, 0.0, 360.0);
        path
    }
}

/// Builds a progress arc for `pct`, clamped to `[0, 100]`. Non-finite input counts as 0.
pub fn progress_arc_path(center: Point, radius: f64, stroke_width: f64, pct: f64) -> ProgressArc {
    let percent = if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let sweep_deg = percent * 3.6;
    let path = (sweep_deg > SWEEP_EPSILON_DEG).then(|| {
        let mut path = ArcPath::new();
        path.push(PathCommand::MoveTo(polar_to_cartesian(center, radius, 0.0)));
        path.arc(center, radius, 0.0, sweep_deg);
        path
    });
    ProgressArc {
        center,
        radius,
        stroke_width,
        percent,
        sweep_deg,
        path,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Shape;

    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    fn outer_arc_flag(path: &ArcPath) -> bool {
        match path.commands()[1] {
            PathCommand::ArcTo { large_arc, .. } => large_arc,
            other => panic!("expected an arc, got {other:?}"),
        }
    }

    #[test]
    fn zero_degrees_points_up() {
        let c = Point::new(100.0, 100.0);
        assert!(approx(polar_to_cartesian(c, 10.0, 0.0), Point::new(100.0, 90.0)));
        assert!(approx(polar_to_cartesian(c, 10.0, 90.0), Point::new(110.0, 100.0)));
        assert!(approx(polar_to_cartesian(c, 10.0, 180.0), Point::new(100.0, 110.0)));
        assert!(approx(polar_to_cartesian(c, 10.0, 270.0), Point::new(90.0, 100.0)));
    }

    #[test]
    fn large_arc_flag_boundaries() {
        assert!(!large_arc_flag(179.0));
        assert!(!large_arc_flag(180.0));
        assert!(large_arc_flag(181.0));

        let c = Point::ZERO;
        let small = donut_wedge_path(c, 50.0, 30.0, 0.0, 160.0).unwrap();
        let large = donut_wedge_path(c, 50.0, 30.0, 0.0, 200.0).unwrap();
        assert!(!outer_arc_flag(&small));
        assert!(outer_arc_flag(&large));
        assert!(!outer_arc_flag(&donut_wedge_path(c, 50.0, 30.0, 10.0, 190.0).unwrap()));
    }

    #[test]
    fn wedge_traces_outer_then_inner() {
        let c = Point::new(50.0, 50.0);
        let p = donut_wedge_path(c, 40.0, 20.0, 0.0, 90.0).unwrap();
        let cmds = p.commands();
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], PathCommand::MoveTo(pt) if approx(pt, Point::new(50.0, 10.0))));
        assert!(matches!(
            cmds[1],
            PathCommand::ArcTo { clockwise: true, to, .. } if approx(to, Point::new(90.0, 50.0))
        ));
        assert!(matches!(cmds[2], PathCommand::LineTo(pt) if approx(pt, Point::new(70.0, 50.0))));
        assert!(matches!(
            cmds[3],
            PathCommand::ArcTo { clockwise: false, to, .. } if approx(to, Point::new(50.0, 30.0))
        ));
        assert_eq!(cmds[4], PathCommand::Close);
        assert_eq!(
            p.to_svg_d(),
            "M50.000 10.000 A40.000 40.000 0 0 1 90.000 50.000 L70.000 50.000 \
             A20.000 20.000 0 0 0 50.000 30.000 Z"
        );
    }

    #[test]
    fn degenerate_wedges_are_skipped() {
        let c = Point::ZERO;
        assert!(donut_wedge_path(c, 40.0, 20.0, 10.0, 10.0).is_none());
        assert!(donut_wedge_path(c, 40.0, 20.0, 10.0, 5.0).is_none());
        assert!(donut_wedge_path(c, 40.0, 20.0, 0.0, f64::NAN).is_none());
    }

    #[test]
    fn full_ring_is_two_closed_loops() {
        let p = donut_wedge_path(Point::ZERO, 40.0, 20.0, 0.0, 360.0).unwrap();
        let arcs = p
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::ArcTo { .. }))
            .count();
        assert_eq!(arcs, 4, "each circle is split into two half arcs");
        let area = p.to_bez_path().area().abs();
        let expected = core::f64::consts::PI * (40.0 * 40.0 - 20.0 * 20.0);
        assert!((area - expected).abs() / expected < 0.01, "area {area}");
    }

    #[test]
    fn pie_slice_goes_through_center() {
        let p = donut_wedge_path(Point::ZERO, 10.0, 0.0, 0.0, 90.0).unwrap();
        assert!(matches!(p.commands()[2], PathCommand::LineTo(pt) if pt == Point::ZERO));
    }

    #[test]
    fn progress_is_clamped() {
        let c = Point::new(60.0, 60.0);
        let over = progress_arc_path(c, 40.0, 8.0, 140.0);
        assert_eq!(over.percent, 100.0);
        assert_eq!(over.sweep_deg, 360.0);
        let under = progress_arc_path(c, 40.0, 8.0, -5.0);
        assert_eq!(under.percent, 0.0);
        assert!(under.path.is_none());
        let half = progress_arc_path(c, 40.0, 8.0, 50.0).path.unwrap();
        let Some(&PathCommand::ArcTo { to, large_arc, .. }) = half.commands().last() else {
            panic!("expected the indicator to end in an arc");
        };
        assert!(!large_arc);
        assert!(approx(to, Point::new(60.0, 100.0)));
        assert_eq!(over.track_path().commands().len(), 3);
    }
}
