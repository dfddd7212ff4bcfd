//! Screen-space geometry for the incision diagram.
//!
//! Kept separate from the UI layer so the arc sampling is testable without
//! constructing a rendering surface.

use crate::plan::ArcDescriptor;
use egui::{Pos2, pos2};

/// Arc circle radius as a fraction of the (square) surface width.
pub const RADIUS_FRACTION: f32 = 0.35;
/// Arc stroke width as a fraction of the surface width.
pub const STROKE_FRACTION: f32 = 0.015;

const MIN_SEGMENTS: usize = 8;
const MAX_SEGMENTS: usize = 256;
const SEGMENTS_PER_RADIAN: f64 = 48.0;

/// A point on the circle of `radius` around `center` at `angle_radians`.
///
/// Screen coordinates grow downward, so negative angles (the resolver's
/// convention for counter-clockwise clinical axes) land above the center.
pub fn point_on_circle(center: Pos2, radius: f32, angle_radians: f64) -> Pos2 {
    let (sin, cos) = angle_radians.sin_cos();
    pos2(
        radius.mul_add(to_f32(cos), center.x),
        radius.mul_add(to_f32(sin), center.y),
    )
}

/// Sample an arc descriptor into a polyline spanning
/// `[center − half_span, center + half_span]` on the circle.
pub fn arc_polyline(descriptor: &ArcDescriptor, center: Pos2, radius: f32) -> Vec<Pos2> {
    let span = 2.0 * descriptor.half_span_radians;
    let start = descriptor.center_angle_radians - descriptor.half_span_radians;
    let segments = segment_count(span);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = usize_to_f64(i) / usize_to_f64(segments);
        let angle = span.mul_add(t, start);
        points.push(point_on_circle(center, radius, angle));
    }
    points
}

fn segment_count(span_radians: f64) -> usize {
    let raw = (span_radians.abs() * SEGMENTS_PER_RADIAN).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = raw.clamp(0.0, usize_to_f64(MAX_SEGMENTS)) as usize;
    count.clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

const fn to_f32(value: f64) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        value as f32
    }
}

const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f64
    }
}
