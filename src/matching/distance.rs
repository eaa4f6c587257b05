//! Squared Euclidean distance between hash vectors.
//!
//! For two hashes `a` and `b` the distance is `sum((a[i] - b[i])^2)` with each
//! difference taken as a signed value in `-255..=255`. Identical hashes have
//! distance 0 and a full 144-byte hash peaks at `144 * 255^2 = 9_363_600`.

use crate::core::hash::HashVector;

/// Distance between two hashes
///
/// Hashes of unequal length are compared over the shorter of the two; the
/// stores never produce such pairs.
pub fn distance(a: &HashVector, b: &HashVector) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(&x, &y)| squared_difference(x, y))
        .sum()
}

/// Distance between two hashes, abandoned once it exceeds `limit`.
///
/// Returns `Some(distance)` when the full distance is `<= limit` and `None`
/// as soon as the running sum passes `limit`. The partial sums only grow, so
/// stopping early never changes the answer.
pub fn bounded_distance(a: &HashVector, b: &HashVector, limit: u64) -> Option<u64> {
    debug_assert_eq!(a.len(), b.len());
    let mut total = 0u64;
    for (&x, &y) in a.as_bytes().iter().zip(b.as_bytes()) {
        total += squared_difference(x, y);
        if total > limit {
            return None;
        }
    }
    Some(total)
}

#[inline]
fn squared_difference(x: u8, y: u8) -> u64 {
    let diff = u64::from(x.abs_diff(y));
    diff * diff
}
