//! Patrol destination sampling.

use glam::Vec3;

use crate::world::NavSurface;

/// Samples a point uniformly inside the unit ball.
///
/// Rejection sampling over the enclosing cube: uniform over the volume,
/// not the surface.
fn sample_unit_ball(rng: &mut fastrand::Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Samples a point uniformly inside a sphere of `radius` around `center`.
#[must_use]
pub fn sample_in_sphere(rng: &mut fastrand::Rng, center: Vec3, radius: f32) -> Vec3 {
    center + sample_unit_ball(rng) * radius
}

/// Picks the next patrol destination around `center`.
///
/// The sampled point is snapped to the nearest navigable position within
/// `radius`; when nothing navigable is in range, `center` itself is
/// returned so the destination is always reachable.
pub fn next_patrol_point<N: NavSurface + ?Sized>(
    rng: &mut fastrand::Rng,
    center: Vec3,
    radius: f32,
    nav: &N,
) -> Vec3 {
    let candidate = sample_in_sphere(rng, center, radius);
    nav.sample_nearest(candidate, radius).unwrap_or(center)
}
