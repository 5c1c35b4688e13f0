//! Connector geometry engine.
//!
//! Pure functions that turn measured card rectangles into cubic-Bézier path
//! descriptors, all expressed in the container's coordinate space. Every
//! connector variant shares the same conventions: a fixed straight stub in
//! front of the arrowhead, a floored horizontal run so near-overlapping
//! cards never produce kinked curves, and an asymmetric 0.6/0.35 control
//! split that leaves the source steeply and arrives at the target shallowly.

use std::fmt;

pub mod merge;

pub use merge::{MERGE_MIN_GAP, MergePoint, merge_point};

// ── Arrow approach ──────────────────────────────────────────────────
/// Straight run kept between the curve and the arrowhead base.
pub const STRAIGHT_SEGMENT: f32 = 12.0;
/// Length of the arrowhead marker itself.
pub const ARROW_LENGTH: f32 = 16.0;

// ── Run flooring ────────────────────────────────────────────────────
/// Default floor on the horizontal run used to scale control points.
pub const DEFAULT_MIN_DX: f32 = 72.0;
/// Floor on the run of feeder curves into a merge point.
const MERGE_FEEDER_MIN_RUN: f32 = 80.0;

// ── Curve shaping ───────────────────────────────────────────────────
/// Fraction of the run used for the departure control point.
const DEPART_RATIO: f32 = 0.6;
/// Fraction of the run used for the arrival control point.
const ARRIVE_RATIO: f32 = 0.35;
/// Arrival ratio for feeder curves (no stub, slightly tighter arrival).
const MERGE_ARRIVE_RATIO: f32 = 0.3;
/// Control offset ratio for vertical connectors.
const VERTICAL_RATIO: f32 = 0.4;
/// Clamp on the collector curve's vertical control span.
const COLLECTOR_DY_CLAMP: f32 = 48.0;
/// Horizontal clearance kept between a routed path and its floating label.
const LABEL_CLEARANCE: f32 = 8.0;

/// Axis-aligned bounding box in container coordinates.
///
/// Produced fresh on every measurement and never mutated; a `Rect` is only
/// valid for the recomputation cycle that measured it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Vertical anchor on a card edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorY {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Card edge a connector departs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

/// Per-connector routing options.
///
/// All fields are biases over the default "leave the right edge at its
/// vertical center, arrive at the nearer edge of the target" behaviour.
#[derive(Debug, Clone, Copy)]
pub struct PathOptions {
    /// Shared vertical bias applied to both endpoints.
    pub offset: f32,
    /// Extra vertical bias on the source endpoint.
    pub from_offset: f32,
    /// Extra vertical bias on the target endpoint.
    pub to_offset: f32,
    pub from_anchor_y: AnchorY,
    pub to_anchor_y: AnchorY,
    /// Pixels the source anchor moves inward from a top/bottom anchor edge.
    pub from_inset: f32,
    pub to_inset: f32,
    pub from_side: Side,
    /// Horizontal position along a top/bottom departure edge (0..1).
    pub from_x_fraction: f32,
    /// Horizontal position along the target's top edge (vertical connector).
    pub to_x_fraction: f32,
    /// Floor on the horizontal run used to scale control points.
    pub min_dx: f32,
    /// Upward bias subtracted from control-point y values.
    pub arc_lift: f32,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            from_offset: 0.0,
            to_offset: 0.0,
            from_anchor_y: AnchorY::Center,
            to_anchor_y: AnchorY::Center,
            from_inset: 0.0,
            to_inset: 0.0,
            from_side: Side::Right,
            from_x_fraction: 0.5,
            to_x_fraction: 0.5,
            min_dx: DEFAULT_MIN_DX,
            arc_lift: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    CurveTo {
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
}

/// Ordered path commands for one connector.
///
/// Renders through `Display` as `M x y C c1x c1y, c2x c2y, ex ey [L x y]`
/// with fixed two-decimal coordinates, so repeated computations over the
/// same rectangles produce byte-identical markup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathDescriptor {
    commands: Vec<PathCommand>,
}

impl PathDescriptor {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Final on-path point, i.e. the target anchor for non-empty paths.
    pub fn end_point(&self) -> Option<(f32, f32)> {
        self.commands.last().map(|command| match *command {
            PathCommand::MoveTo { x, y } => (x, y),
            PathCommand::CurveTo { x, y, .. } => (x, y),
            PathCommand::LineTo { x, y } => (x, y),
        })
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    fn curve_to(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) {
        self.commands.push(PathCommand::CurveTo {
            c1x: c1.0,
            c1y: c1.1,
            c2x: c2.0,
            c2y: c2.1,
            x: end.0,
            y: end.1,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo { x, y });
    }
}

impl fmt::Display for PathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, command) in self.commands.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match *command {
                PathCommand::MoveTo { x, y } => write!(f, "M {x:.2} {y:.2}")?,
                PathCommand::CurveTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => write!(f, "C {c1x:.2} {c1y:.2}, {c2x:.2} {c2y:.2}, {x:.2} {y:.2}")?,
                PathCommand::LineTo { x, y } => write!(f, "L {x:.2} {y:.2}")?,
            }
        }
        Ok(())
    }
}

/// Labelled connector output: the routed path plus the label's center.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledPath {
    pub path: PathDescriptor,
    pub label_anchor: Option<(f32, f32)>,
}

fn anchored_y(rect: &Rect, anchor: AnchorY, inset: f32, bias: f32) -> f32 {
    let base = match anchor {
        AnchorY::Top => rect.top + inset,
        AnchorY::Center => rect.center_y(),
        AnchorY::Bottom => rect.bottom() - inset,
    };
    base + bias
}

fn start_point(from: &Rect, options: &PathOptions) -> (f32, f32) {
    let bias = options.offset + options.from_offset;
    match options.from_side {
        Side::Left => (
            from.left,
            anchored_y(from, options.from_anchor_y, options.from_inset, bias),
        ),
        Side::Right => (
            from.right(),
            anchored_y(from, options.from_anchor_y, options.from_inset, bias),
        ),
        Side::Top => (
            from.left + from.width * options.from_x_fraction,
            from.top + bias,
        ),
        Side::Bottom => (
            from.left + from.width * options.from_x_fraction,
            from.bottom() + bias,
        ),
    }
}

/// Target edge selection: approach the left edge when the start precedes
/// it, the right edge otherwise. The returned direction is the x travel of
/// the final approach (`+1.0` rightwards, `-1.0` leftwards).
fn end_anchor(x1: f32, to: &Rect, options: &PathOptions) -> (f32, f32, f32) {
    let bias = options.offset + options.to_offset;
    let (x2, arrow_dir) = if x1 < to.left {
        (to.left, 1.0)
    } else {
        (to.right(), -1.0)
    };
    let y2 = anchored_y(to, options.to_anchor_y, options.to_inset, bias);
    (x2, y2, arrow_dir)
}

/// Horizontal run floored at `min_dx`; a zero raw run falls back to the
/// supplied direction instead of collapsing the curve.
fn floored_run(raw: f32, min_dx: f32, fallback_dir: f32) -> f32 {
    let dir = if raw == 0.0 { fallback_dir } else { raw.signum() };
    dir * raw.abs().max(min_dx)
}

/// Simple curved connector between two cards.
///
/// Returns an empty descriptor while either endpoint is unmeasured; callers
/// treat that as "no path yet", not as an error.
pub fn curved_connector(from: Option<Rect>, to: Option<Rect>, options: &PathOptions) -> PathDescriptor {
    let (Some(from), Some(to)) = (from, to) else {
        return PathDescriptor::empty();
    };
    let (x1, y1) = start_point(&from, options);
    let (x2, y2, arrow_dir) = end_anchor(x1, &to, options);

    let stub = STRAIGHT_SEGMENT + ARROW_LENGTH;
    let stub_x = x2 - arrow_dir * stub;
    let run = floored_run(stub_x - x1, options.min_dx, arrow_dir);

    let mut path = PathDescriptor::empty();
    path.move_to(x1, y1);
    path.curve_to(
        (x1 + DEPART_RATIO * run, y1 - options.arc_lift),
        (stub_x - ARRIVE_RATIO * run, y2 - 0.6 * options.arc_lift),
        (stub_x, y2),
    );
    path.line_to(x2, y2);
    path
}

/// Vertical connector from the bottom edge of `from` to the top edge of
/// `to`. Differing x fractions yield an S-curve.
pub fn vertical_connector(from: Option<Rect>, to: Option<Rect>, options: &PathOptions) -> PathDescriptor {
    let (Some(from), Some(to)) = (from, to) else {
        return PathDescriptor::empty();
    };
    let x1 = from.left + from.width * options.from_x_fraction;
    let y1 = from.bottom();
    let x2 = to.left + to.width * options.to_x_fraction;
    let y2 = to.top;

    let stub_y = y2 - (STRAIGHT_SEGMENT + ARROW_LENGTH);
    let run = stub_y - y1;

    let mut path = PathDescriptor::empty();
    path.move_to(x1, y1);
    path.curve_to(
        (x1, y1 + VERTICAL_RATIO * run),
        (x2, stub_y - VERTICAL_RATIO * run),
        (x2, stub_y),
    );
    path.line_to(x2, y2);
    path
}

/// Merge-point connector.
///
/// One parametrized primitive covers both halves of an N-to-1 topology:
/// feeder mode (`is_from_merge == false`) curves a source card into the
/// merge point, collector mode (`is_from_merge == true`) carries the single
/// shared segment from the merge point into the target card. Callers build
/// a fan-in by invoking feeder mode once per source plus collector mode
/// exactly once.
pub fn merge_connector(
    from: Option<Rect>,
    to: Option<Rect>,
    merge: MergePoint,
    is_from_merge: bool,
    options: &PathOptions,
) -> PathDescriptor {
    if is_from_merge {
        collector_path(to, merge, options)
    } else {
        feeder_path(from, merge, options)
    }
}

fn feeder_path(from: Option<Rect>, merge: MergePoint, options: &PathOptions) -> PathDescriptor {
    let Some(from) = from else {
        return PathDescriptor::empty();
    };
    let feeder_options = PathOptions {
        // The merge point carries no independent offset; only the source
        // bias applies.
        offset: 0.0,
        to_offset: 0.0,
        ..*options
    };
    let (x1, y1) = start_point(&from, &feeder_options);
    let run = floored_run(merge.x - x1, MERGE_FEEDER_MIN_RUN, 1.0);

    let mut path = PathDescriptor::empty();
    path.move_to(x1, y1);
    path.curve_to(
        (x1 + DEPART_RATIO * run, y1),
        (merge.x - MERGE_ARRIVE_RATIO * run, merge.y),
        (merge.x, merge.y),
    );
    path
}

fn collector_path(to: Option<Rect>, merge: MergePoint, options: &PathOptions) -> PathDescriptor {
    let Some(to) = to else {
        return PathDescriptor::empty();
    };
    let (x1, y1) = (merge.x, merge.y);
    let (x2, y2, arrow_dir) = end_anchor(x1, &to, options);

    let stub = STRAIGHT_SEGMENT + ARROW_LENGTH;
    let stub_x = x2 - arrow_dir * stub;
    let run = floored_run(stub_x - x1, options.min_dx, arrow_dir);
    let vspan = (ARRIVE_RATIO * (y2 - y1)).clamp(-COLLECTOR_DY_CLAMP, COLLECTOR_DY_CLAMP);

    let mut path = PathDescriptor::empty();
    path.move_to(x1, y1);
    path.curve_to(
        (x1 + DEPART_RATIO * run, y1 + vspan),
        (stub_x - ARRIVE_RATIO * run, y2),
        (stub_x, y2),
    );
    path.line_to(x2, y2);
    path
}

/// Curved connector routed around a floating mid-path label.
///
/// The label is centered on the path midpoint; the curve is split into two
/// halves that stop short of the label box on either side, so the stroke
/// never crosses the label text. When the cards sit too close for the split
/// to fit, the plain curved route is used and the label simply overlays it.
pub fn labelled_connector(
    from: Option<Rect>,
    to: Option<Rect>,
    label_width: f32,
    options: &PathOptions,
) -> LabelledPath {
    let (Some(from_rect), Some(to_rect)) = (from, to) else {
        return LabelledPath {
            path: PathDescriptor::empty(),
            label_anchor: None,
        };
    };
    let (x1, y1) = start_point(&from_rect, options);
    let (x2, y2, arrow_dir) = end_anchor(x1, &to_rect, options);

    let stub = STRAIGHT_SEGMENT + ARROW_LENGTH;
    let stub_x = x2 - arrow_dir * stub;
    let mid_x = (x1 + stub_x) / 2.0;
    let mid_y = (y1 + y2) / 2.0;
    let half = label_width / 2.0 + LABEL_CLEARANCE;

    let available = (stub_x - x1).abs();
    if available < 2.0 * half + stub {
        return LabelledPath {
            path: curved_connector(from, to, options),
            label_anchor: Some((mid_x, mid_y)),
        };
    }

    let gap_in = mid_x - arrow_dir * half;
    let gap_out = mid_x + arrow_dir * half;
    let run_in = floored_run(gap_in - x1, 0.0, arrow_dir);
    let run_out = floored_run(stub_x - gap_out, 0.0, arrow_dir);

    let mut path = PathDescriptor::empty();
    path.move_to(x1, y1);
    path.curve_to(
        (x1 + DEPART_RATIO * run_in, y1 - options.arc_lift),
        (gap_in - ARRIVE_RATIO * run_in, mid_y),
        (gap_in, mid_y),
    );
    path.move_to(gap_out, mid_y);
    path.curve_to(
        (gap_out + DEPART_RATIO * run_out, mid_y),
        (stub_x - ARRIVE_RATIO * run_out, y2 - 0.6 * options.arc_lift),
        (stub_x, y2),
    );
    path.line_to(x2, y2);
    LabelledPath {
        path,
        label_anchor: Some((mid_x, mid_y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(left: f32, top: f32) -> Rect {
        Rect::new(left, top, 100.0, 40.0)
    }

    fn last_two_points(path: &PathDescriptor) -> ((f32, f32), (f32, f32)) {
        let commands = path.commands();
        let end = path.end_point().expect("non-empty path");
        let prev = match commands[commands.len() - 2] {
            PathCommand::MoveTo { x, y } => (x, y),
            PathCommand::CurveTo { x, y, .. } => (x, y),
            PathCommand::LineTo { x, y } => (x, y),
        };
        (prev, end)
    }

    #[test]
    fn curved_connector_matches_reference_scenario() {
        let from = card(0.0, 0.0);
        let to = card(300.0, 100.0);
        let path = curved_connector(Some(from), Some(to), &PathOptions::default());
        assert_eq!(
            path.to_string(),
            "M 100.00 20.00 C 203.20 20.00, 211.80 120.00, 272.00 120.00 L 300.00 120.00"
        );
        assert_eq!(path.end_point(), Some((300.0, 120.0)));
    }

    #[test]
    fn curved_connector_is_deterministic() {
        let from = card(3.7, 11.2);
        let to = card(412.9, 87.3);
        let options = PathOptions {
            arc_lift: 14.0,
            offset: 3.0,
            ..PathOptions::default()
        };
        let first = curved_connector(Some(from), Some(to), &options).to_string();
        for _ in 0..8 {
            let again = curved_connector(Some(from), Some(to), &options).to_string();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn stub_length_is_fixed_before_the_arrowhead() {
        let from = card(0.0, 0.0);
        let to = card(400.0, 60.0);
        let path = curved_connector(Some(from), Some(to), &PathOptions::default());
        let ((sx, sy), (ex, ey)) = last_two_points(&path);
        assert_eq!(sy, ey);
        assert_eq!((ex - sx).abs(), STRAIGHT_SEGMENT + ARROW_LENGTH);
    }

    #[test]
    fn short_runs_are_floored_at_min_dx() {
        let from = card(0.0, 0.0);
        // Target close enough that the naive run is well under the floor.
        let to = card(140.0, 0.0);
        let path = curved_connector(Some(from), Some(to), &PathOptions::default());
        let PathCommand::CurveTo { c1x, .. } = path.commands()[1] else {
            panic!("expected a curve segment");
        };
        assert_eq!(c1x, 100.0 + 0.6 * DEFAULT_MIN_DX);
    }

    #[test]
    fn swapped_cards_flip_the_approach_side() {
        let left = card(0.0, 0.0);
        let right = card(300.0, 100.0);
        let forward = curved_connector(Some(left), Some(right), &PathOptions::default());
        let backward = curved_connector(Some(right), Some(left), &PathOptions::default());

        // Forward approaches the target's left edge travelling rightwards.
        let ((f_stub_x, _), (f_end_x, _)) = last_two_points(&forward);
        assert_eq!(f_end_x, 300.0);
        assert!(f_stub_x < f_end_x);

        // Backward departs the right card's right edge and must come back
        // around to the left card's right edge travelling leftwards.
        let ((b_stub_x, _), (b_end_x, b_end_y)) = last_two_points(&backward);
        assert_eq!(b_end_x, left.right());
        assert!(b_stub_x > b_end_x);
        assert_eq!(b_end_y, left.center_y());
        assert_eq!(
            (b_stub_x - b_end_x).abs(),
            STRAIGHT_SEGMENT + ARROW_LENGTH,
            "stub length must survive the side flip"
        );
    }

    #[test]
    fn unmeasured_inputs_yield_an_empty_descriptor() {
        let rect = card(0.0, 0.0);
        let options = PathOptions::default();
        assert!(curved_connector(None, Some(rect), &options).is_empty());
        assert!(curved_connector(Some(rect), None, &options).is_empty());
        assert!(vertical_connector(None, None, &options).is_empty());
        assert!(
            merge_connector(None, Some(rect), MergePoint { x: 0.0, y: 0.0 }, false, &options)
                .is_empty()
        );
        assert!(
            merge_connector(Some(rect), None, MergePoint { x: 0.0, y: 0.0 }, true, &options)
                .is_empty()
        );
        assert_eq!(PathDescriptor::empty().to_string(), "");
    }

    #[test]
    fn vertical_connector_builds_an_s_curve() {
        let from = Rect::new(40.0, 0.0, 120.0, 40.0);
        let to = Rect::new(200.0, 160.0, 120.0, 40.0);
        let path = vertical_connector(Some(from), Some(to), &PathOptions::default());
        let ((sx, sy), (ex, ey)) = last_two_points(&path);
        assert_eq!((ex, ey), (260.0, 160.0));
        assert_eq!(sx, ex);
        assert_eq!(ey - sy, STRAIGHT_SEGMENT + ARROW_LENGTH);
        let PathCommand::CurveTo { c1x, c2x, .. } = path.commands()[1] else {
            panic!("expected a curve segment");
        };
        // Control points hug their own endpoints' x, which is what bends
        // the path into an S when the fractions differ.
        assert_eq!(c1x, 100.0);
        assert_eq!(c2x, 260.0);
    }

    #[test]
    fn feeder_run_is_floored_at_eighty() {
        let from = card(0.0, 0.0);
        let merge = MergePoint { x: 130.0, y: 80.0 };
        let path = merge_connector(Some(from), None, merge, false, &PathOptions::default());
        let PathCommand::CurveTo { c1x, x, y, .. } = path.commands()[1] else {
            panic!("expected a curve segment");
        };
        assert_eq!((x, y), (130.0, 80.0));
        assert_eq!(c1x, 100.0 + 0.6 * 80.0);
        // Feeders end at the merge point itself; no straight stub.
        assert_eq!(path.commands().len(), 2);
    }

    #[test]
    fn feeder_ignores_shared_and_target_offsets() {
        let from = card(0.0, 0.0);
        let merge = MergePoint { x: 300.0, y: 50.0 };
        let options = PathOptions {
            offset: 25.0,
            to_offset: 40.0,
            from_offset: 6.0,
            ..PathOptions::default()
        };
        let path = merge_connector(Some(from), None, merge, false, &options);
        let PathCommand::MoveTo { y, .. } = path.commands()[0] else {
            panic!("expected a move");
        };
        assert_eq!(y, 26.0);
    }

    #[test]
    fn collector_clamps_the_vertical_control_span() {
        let to = card(400.0, 300.0);
        let merge = MergePoint { x: 100.0, y: 20.0 };
        let path = merge_connector(None, Some(to), merge, true, &PathOptions::default());
        let PathCommand::CurveTo { c1y, .. } = path.commands()[1] else {
            panic!("expected a curve segment");
        };
        // Δy = 300 here; 0.35 × Δy would be 105, clamped to 48.
        assert_eq!(c1y - 20.0, COLLECTOR_DY_CLAMP);
        assert_eq!(path.end_point(), Some((400.0, 320.0)));
    }

    #[test]
    fn labelled_connector_leaves_a_gap_for_the_label() {
        let from = card(0.0, 0.0);
        let to = card(500.0, 100.0);
        let labelled = labelled_connector(Some(from), Some(to), 60.0, &PathOptions::default());
        let (mx, my) = labelled.label_anchor.expect("label anchor");
        let moves: Vec<(f32, f32)> = labelled
            .path
            .commands()
            .iter()
            .filter_map(|command| match *command {
                PathCommand::MoveTo { x, y } => Some((x, y)),
                _ => None,
            })
            .collect();
        assert_eq!(moves.len(), 2);
        // Second subpath resumes on the far side of the label box.
        assert!(moves[1].0 > mx + 60.0 / 2.0);
        assert_eq!(moves[1].1, my);
        assert_eq!(labelled.path.end_point(), Some((500.0, 120.0)));
    }

    #[test]
    fn labelled_connector_falls_back_when_cards_are_close() {
        let from = card(0.0, 0.0);
        let to = card(150.0, 20.0);
        let labelled = labelled_connector(Some(from), Some(to), 90.0, &PathOptions::default());
        let plain = curved_connector(Some(from), Some(to), &PathOptions::default());
        assert_eq!(labelled.path, plain);
        assert!(labelled.label_anchor.is_some());
    }
}
