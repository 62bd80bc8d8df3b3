//! Support and resistance levels.

use fx_core::{PriceLevels, PricePoint};

/// Support (lowest low) and resistance (highest high) over the last
/// `window` points, or all of them if there are fewer.
pub fn price_levels(points: &[PricePoint], window: usize) -> Option<PriceLevels> {
    let start = points.len().saturating_sub(window);
    let recent = &points[start..];
    if recent.is_empty() {
        return None;
    }

    let support = recent.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let resistance = recent
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(PriceLevels {
        support,
        resistance,
    })
}
