//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Return the minimum and maximum of a sequence of values.
///
/// `NaN` values are skipped. Returns `None` if the sequence holds no
/// comparable values.
pub fn min_max<T, I>(values: I) -> Option<(T, T)>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Expand the range `[min, max]` outwards by `fraction` of its span on each
/// side.
///
/// A zero span range is returned unchanged.
pub fn pad_range<T>(min: T, max: T, fraction: T) -> (T, T)
where
    T: Float,
{
    let pad = fraction * (max - min);
    (min - pad, max + pad)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(vec![3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(vec![std::f64::NAN, 4.0]), Some((4.0, 4.0)));
        assert_eq!(min_max(Vec::<f64>::new()), None);
        assert_eq!(min_max(vec![std::f64::NAN]), None);
    }

    #[test]
    fn test_pad_range() {
        assert_eq!(pad_range(0.0, 10.0, 0.1), (-1.0, 11.0));
        assert_eq!(pad_range(5.0, 5.0, 0.1), (5.0, 5.0));
        assert_eq!(pad_range(-2.0, 2.0, 0.0), (-2.0, 2.0));
    }
}
