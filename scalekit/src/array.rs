//! Numeric array helpers shared by the scales: tick generation, bisection
//! and quantiles.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Generate approximately `count` evenly spaced, human friendly values
/// between `start` and `stop` (inclusive), in the direction of the interval.
///
/// Returns an empty vector when `count` is not a positive finite number or
/// when either bound is NaN.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !count.is_finite() {
        tracing::debug!("ticks requested with invalid count {count}");
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) {
        return vec![];
    }

    let n = (i2 - i1 + 1.0) as usize;
    let tick = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|i| tick(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| tick(i1 + i as f64)).collect()
    }
}

/// Returns the tick multiplier range `(i1, i2)` and the increment. A negative
/// increment `-k` means the step is `1 / k`, which keeps decimal ticks exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && 0.5 <= count && count < 2.0 {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// The tick increment for the given interval, using the same encoding as
/// `tick_spec`: positive for whole steps, `-k` for a step of `1 / k`.
///
/// NaN for an invalid count or a degenerate interval.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    if !(count > 0.0) || !count.is_finite() || start == stop {
        return f64::NAN;
    }
    tick_spec(start, stop, count).2
}

/// The signed tick step for the given interval.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Index of the first element strictly greater than `x` in an ascending slice.
pub fn bisect_right<T: PartialOrd>(values: &[T], x: &T) -> usize {
    values.partition_point(|v| v <= x)
}

/// Quantile of an ascending, NaN-free sample using linear interpolation
/// between closest ranks (R-7).
pub fn quantile_sorted(values: &[f64], p: f64) -> Option<f64> {
    let n = values.len();
    if n == 0 || p.is_nan() {
        return None;
    }
    if p <= 0.0 || n < 2 {
        return Some(values[0]);
    }
    if p >= 1.0 {
        return Some(values[n - 1]);
    }
    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let value0 = values[i0];
    let value1 = values[i0 + 1];
    Some(value0 + (value1 - value0) * (i - i0 as f64))
}

/// Extend the first and last entries of `domain` outward using the given
/// floor and ceil functions. Interior entries and direction are preserved.
pub fn nice_extent<T: Copy + PartialOrd>(
    domain: &[T],
    floor: impl Fn(T) -> T,
    ceil: impl Fn(T) -> T,
) -> Vec<T> {
    let mut domain = domain.to_vec();
    if domain.is_empty() {
        return domain;
    }
    let (mut i0, mut i1) = (0, domain.len() - 1);
    if domain[i1] < domain[i0] {
        std::mem::swap(&mut i0, &mut i1);
    }
    let (x0, x1) = (domain[i0], domain[i1]);
    domain[i0] = floor(x0);
    domain[i1] = ceil(x1);
    domain
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0])]
    #[case(8.0, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0])]
    #[case(7.0, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0])]
    #[case(4.0, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0])]
    #[case(3.0, vec![0.0, 0.5, 1.0])]
    #[case(2.0, vec![0.0, 0.5, 1.0])]
    #[case(1.0, vec![0.0, 1.0])]
    fn test_ticks_unit_interval(#[case] count: f64, #[case] expected: Vec<f64>) {
        assert_eq!(ticks(0.0, 1.0, count), expected);
    }

    #[test]
    fn test_ticks_reversed() {
        assert_eq!(ticks(1.0, 0.0, 2.0), vec![1.0, 0.5, 0.0]);
        assert_eq!(ticks(10.0, -10.0, 5.0), vec![10.0, 5.0, 0.0, -5.0, -10.0]);
    }

    #[test]
    fn test_ticks_edge_cases() {
        assert!(ticks(f64::NAN, 1.0, 1.0).is_empty());
        assert!(ticks(0.0, f64::NAN, 1.0).is_empty());
        assert!(ticks(0.0, 1.0, f64::NAN).is_empty());
        assert!(ticks(0.0, 1.0, 0.0).is_empty());
        assert!(ticks(0.0, 1.0, -1.0).is_empty());
        assert!(ticks(0.0, 1.0, f64::INFINITY).is_empty());
        assert_eq!(ticks(1.0, 1.0, 10.0), vec![1.0]);
    }

    #[test]
    fn test_ticks_fractional_count() {
        // too few candidate ticks at count 0.5 retries with count 1
        assert_eq!(ticks(1.0, 364.0, 0.5), vec![200.0]);
        assert_eq!(ticks(-1.0, 364.0, 0.5), vec![0.0]);
    }

    #[test]
    fn test_tick_increment_and_step() {
        assert_eq!(tick_increment(0.0, 1.0, 10.0), -10.0);
        assert_eq!(tick_increment(0.0, 100.0, 10.0), 10.0);
        assert!(tick_increment(1.0, 1.0, 10.0).is_nan());
        assert_approx_eq!(f64, tick_step(0.0, 1.0, 10.0), 0.1);
        assert_approx_eq!(f64, tick_step(1.0, 0.0, 10.0), -0.1);
        assert_eq!(tick_step(0.0, 1000.0, 5.0), 200.0);
    }

    #[test]
    fn test_bisect_right() {
        let values = [1.0, 2.0, 2.0, 3.0];
        assert_eq!(bisect_right(&values, &0.0), 0);
        assert_eq!(bisect_right(&values, &2.0), 3);
        assert_eq!(bisect_right(&values, &4.0), 4);
    }

    #[test]
    fn test_quantile_sorted() {
        let sample = [3.0, 6.0, 7.0, 8.0, 8.0, 10.0, 13.0, 15.0, 16.0, 20.0];
        assert_approx_eq!(f64, quantile_sorted(&sample, 0.25).unwrap(), 7.25);
        assert_approx_eq!(f64, quantile_sorted(&sample, 0.5).unwrap(), 9.0);
        assert_approx_eq!(f64, quantile_sorted(&sample, 0.75).unwrap(), 14.5);
        assert_eq!(quantile_sorted(&sample, 0.0), Some(3.0));
        assert_eq!(quantile_sorted(&sample, 1.0), Some(20.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_nice_extent_preserves_direction_and_interior() {
        let niced = nice_extent(&[9.5, 5.0, 0.5], f64::floor, f64::ceil);
        assert_eq!(niced, vec![10.0, 5.0, 0.0]);
    }
}
