//! Circle geometry for collision detection
//!
//! Every entity is a circle. Overlap is strict (`distance < r1 + r2`), so
//! touching circles do not collide.

use glam::Vec2;

/// Strict circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// True if `pos` lies more than `margin` outside a `width` x `height` box
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}

/// One step of simple pursuit: move `speed` toward `target` without overshooting
pub fn pursue(pos: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let to_target = target - pos;
    let dist = to_target.length();
    if dist <= speed {
        return target;
    }
    pos + to_target / dist * speed
}

/// Velocity of magnitude `speed` aimed from `from` at `to`
#[inline]
pub fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    crate::direction(crate::angle_between(from, to)) * speed
}

/// Number of `points` within `reach` of `center`
pub fn points_within<'a>(points: impl IntoIterator<Item = &'a Vec2>, center: Vec2, reach: f32) -> usize {
    let reach_sq = reach * reach;
    points
        .into_iter()
        .filter(|p| p.distance_squared(center) < reach_sq)
        .count()
}
