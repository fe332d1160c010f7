use geo::HaversineDistance as _;

use crate::foundation::core::LatLng;

/// Upper bound on interpolation steps between two consecutive vertices.
pub const MAX_STEPS_PER_PAIR: usize = 10_000;

/// Great-circle distance in meters.
pub fn distance_m(a: LatLng, b: LatLng) -> f64 {
    geo::Point::new(a.lng, a.lat).haversine_distance(&geo::Point::new(b.lng, b.lat))
}

/// Insert linearly interpolated points so no gap greatly exceeds `target_m` meters.
///
/// Every input vertex is kept, in order. Between two consecutive vertices
/// `max(1, floor(distance / target_m))` steps are taken; latitude and longitude are interpolated
/// independently, and the step count is capped at [`MAX_STEPS_PER_PAIR`]. A non-finite or
/// non-positive target disables subdivision.
pub fn densify(points: &[LatLng], target_m: f64) -> Vec<LatLng> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        out.push(a);
        let steps = step_count(distance_m(a, b), target_m);
        for j in 1..steps {
            out.push(a.lerp(b, j as f64 / steps as f64));
        }
    }
    out.push(last);
    out
}

fn step_count(dist: f64, target_m: f64) -> usize {
    if !target_m.is_finite() || target_m <= 0.0 || !dist.is_finite() {
        return 1;
    }
    ((dist / target_m).floor() as usize).clamp(1, MAX_STEPS_PER_PAIR)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/densify.rs"]
mod tests;
