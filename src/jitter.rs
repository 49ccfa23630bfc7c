use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Half-width of the uniform jitter band around the rain's center line.
pub const JITTER_HALF_WIDTH: f64 = 0.15;

/// Offset of the rain's center line from a group's zero-based position,
/// placing the scatter just below the half-violin baseline.
pub const RAIN_OFFSET: f64 = 0.75;

/// Marker area for rain points, small enough not to occlude the box plot.
pub const RAIN_MARKER_SIZE: f64 = 0.3;

/// Secondary-axis coordinates for a group's rain: one uniformly jittered
/// value per observation, centered at `position + 0.75`.
pub fn rain_positions<R: Rng + ?Sized>(count: usize, position: usize, rng: &mut R) -> Vec<f64> {
    let center = position as f64 + RAIN_OFFSET;
    let jitter = Uniform::new_inclusive(-JITTER_HALF_WIDTH, JITTER_HALF_WIDTH);
    (0..count).map(|_| center + jitter.sample(rng)).collect()
}
