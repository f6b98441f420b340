//! Barbell plate calculator.
//!
//! Greedy per-side breakdown of a target total using a fixed plate set.

use serde::Serialize;

/// Standard olympic bar (kg)
pub const BAR_WEIGHT: f64 = 20.0;

/// Plates available per side, heaviest first (kg)
pub const STANDARD_PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

/// Number of plates of one denomination to load on each side
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PlateCount {
    pub weight: f64,
    pub count: u64,
}

/// Full loading summary for a target total
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PlateLoad {
    pub total: f64,
    pub bar_weight: f64,
    /// Weight that should go on each side; 0 when the bar alone suffices
    pub per_side: f64,
    pub plates: Vec<PlateCount>,
    /// Per-side weight the plate set could not make up
    pub leftover: f64,
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute plates per side for `total` using the standard bar and plate set
pub fn calculate_plates(total: f64) -> Vec<PlateCount> {
    plates_for_total(total, BAR_WEIGHT, &STANDARD_PLATES)
}

/// Compute plates per side for `total` on a bar of `bar_weight`
///
/// Returns an empty list (bar only) when `total` is below the bar weight,
/// when either weight is not a finite number, or when the bar weight is
/// negative. `plate_set` is walked in the given order, so pass it heaviest
/// first.
pub fn plates_for_total(total: f64, bar_weight: f64, plate_set: &[f64]) -> Vec<PlateCount> {
    if !is_loadable(total, bar_weight) {
        return Vec::new();
    }

    let mut remaining = (total - bar_weight) / 2.0;
    let mut plates = Vec::new();

    for &plate in plate_set {
        if !plate.is_finite() || plate <= 0.0 || remaining < plate {
            continue;
        }
        let Some(count) = plate_count(remaining, plate) else {
            tracing::warn!("{} kg per side is beyond what can be counted in plates", remaining);
            return Vec::new();
        };
        remaining = round_hundredths(remaining - count as f64 * plate);
        plates.push(PlateCount {
            weight: plate,
            count,
        });
    }

    plates
}

fn is_loadable(total: f64, bar_weight: f64) -> bool {
    total.is_finite() && bar_weight.is_finite() && bar_weight >= 0.0 && total >= bar_weight
}

/// Whole plates of `plate` that fit in `remaining`, if exactly representable
fn plate_count(remaining: f64, plate: f64) -> Option<u64> {
    // Integers above 2^53 are no longer exact in f64
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    let count = (remaining / plate).floor();
    if count.is_finite() && count >= 0.0 && count <= MAX_EXACT {
        Some(count as u64)
    } else {
        None
    }
}

/// Build a loading summary, including what could not be loaded
pub fn plate_load(total: f64, bar_weight: f64, plate_set: &[f64]) -> PlateLoad {
    let plates = plates_for_total(total, bar_weight, plate_set);
    let per_side = if is_loadable(total, bar_weight) {
        (total - bar_weight) / 2.0
    } else {
        0.0
    };
    let loaded: f64 = plates.iter().map(|p| p.weight * p.count as f64).sum();

    PlateLoad {
        total,
        bar_weight,
        per_side,
        plates,
        leftover: round_hundredths(per_side - loaded),
    }
}
