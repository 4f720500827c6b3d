//! Cartesian math for separation checks and path interpolation.
//!
//! Coordinates are local meters (x east, y north, z altitude); no
//! geodetic projection is applied.

use crate::models::Waypoint;

/// Straight-line distance between two points in meters.
pub fn euclidean_distance(a: &Waypoint, b: &Waypoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Linear interpolation `a + ratio * (b - a)` on each axis.
pub fn lerp(a: &Waypoint, b: &Waypoint, ratio: f64) -> Waypoint {
    Waypoint {
        x: a.x + (b.x - a.x) * ratio,
        y: a.y + (b.y - a.y) * ratio,
        z: a.z + (b.z - a.z) * ratio,
    }
}

/// Cumulative arc length from the first point to each point.
pub fn cumulative_distances(points: &[Waypoint]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (idx, point) in points.iter().enumerate() {
        if idx > 0 {
            total += euclidean_distance(&points[idx - 1], point);
        }
        distances.push(total);
    }
    distances
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
