//! Merge-point solver.
//!
//! Computes the single coordinate where a group of feeder connectors
//! converges before the shared final segment into their target.

use super::{Rect, Side};

/// Minimum horizontal clearance between a merge point and the target edge.
pub const MERGE_MIN_GAP: f32 = 36.0;

/// Coordinate where feeder paths converge, in container space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePoint {
    pub x: f32,
    pub y: f32,
}

/// Solve the merge point for a fan-in group.
///
/// The point sits at the target's own vertical midpoint (not an average of
/// the sources) and `max(gap, MERGE_MIN_GAP)` outside the target's near
/// edge. Returns `None` while the target or every source is unmeasured;
/// callers must resolve the point before emitting any output so no frame
/// ever shows the convergence at the coordinate origin.
pub fn merge_point(
    sources: &[Option<Rect>],
    target: Option<Rect>,
    gap: f32,
    side: Side,
) -> Option<MergePoint> {
    let target = target?;
    if !sources.iter().any(|source| source.is_some()) {
        return None;
    }
    let clearance = gap.max(MERGE_MIN_GAP);
    let x = match side {
        Side::Right | Side::Top | Side::Bottom => target.right() + clearance,
        Side::Left => target.left - clearance,
    };
    Some(MergePoint {
        x,
        y: target.center_y(),
    })
}
