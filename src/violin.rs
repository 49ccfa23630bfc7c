/// Rewrite a violin body's density polygon into a half-violin.
///
/// The group at zero-based `position` sits at baseline `position + 1` on the
/// secondary axis. Vertices at or below the baseline collapse onto it,
/// hiding that half; vertices above it are compressed towards the baseline
/// by `scale`. A scale of 0 collapses the whole cloud to a zero-width line.
///
/// `vertical` selects which coordinate carries the density: x for vertical
/// plots, y for horizontal ones.
pub fn to_half_violin(vertices: &mut [(f64, f64)], position: usize, scale: f64, vertical: bool) {
    let baseline = position as f64 + 1.0;
    for vertex in vertices.iter_mut() {
        let coord = if vertical { &mut vertex.0 } else { &mut vertex.1 };
        *coord = if *coord <= baseline {
            baseline
        } else {
            baseline + scale * (*coord - baseline)
        };
    }
}
