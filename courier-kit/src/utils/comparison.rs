use crate::utils::Float;
use std::cmp::Ordering;

/// Compares floating point numbers treating `NaN` as the greatest value.
#[inline]
pub fn compare_floats(a: Float, b: Float) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => match (a.is_nan(), b.is_nan()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        },
    }
}

/// Rounds value to the given amount of decimal places.
#[inline]
pub fn round_to(value: Float, places: i32) -> Float {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
