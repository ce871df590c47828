use indexmap::IndexSet;
use tracing::{trace, warn};

use crate::core::{PathGenerator, ScreenBounds, Transform};
use crate::data::Region;

/// Fraction of the viewport the framed subset is zoomed to fill.
pub const FIT_FILL_RATIO: f64 = 0.5;

/// Computes the layer transform that frames the regions named in `selector`.
///
/// The union of the selected regions' screen bounds is scaled so that it
/// fills half of the limiting viewport dimension and is centered, then
/// shifted right by `offset_x` pixels. Empty selections, zero-extent bounds
/// and any other input yielding a non-finite component produce
/// [`Transform::IDENTITY`]; this function never fails.
#[must_use]
pub fn fit_regions(
    regions: &[Region],
    selector: &IndexSet<String>,
    path: PathGenerator,
    viewport_width: f64,
    viewport_height: f64,
    offset_x: f64,
) -> Transform {
    let mut bounds = ScreenBounds::empty();
    let mut matched = 0usize;
    for region in regions
        .iter()
        .filter(|region| selector.contains(region.name()))
    {
        bounds = bounds.union(path.bounds(region));
        matched += 1;
    }

    if matched == 0 {
        trace!(selector_len = selector.len(), "no regions matched fit selector");
        return Transform::IDENTITY;
    }

    let dx = bounds.width();
    let dy = bounds.height();
    let scale = (viewport_width / dx).min(viewport_height / dy) * FIT_FILL_RATIO;
    let translate_x = viewport_width / 2.0 - (bounds.x0 + dx / 2.0) * scale + offset_x;
    let translate_y = viewport_height / 2.0 - (bounds.y0 + dy / 2.0) * scale;

    let transform = Transform::new(scale, [translate_x, translate_y]);
    if !transform.is_finite() {
        warn!(matched, dx, dy, "degenerate fit bounds, using identity transform");
        return Transform::IDENTITY;
    }
    trace!(matched, scale, translate_x, translate_y, "fitted region subset");
    transform
}
