/// Number of fractional digits kept in report values
pub const REPORT_PRECISION: i32 = 3;

/// Median of the samples, `None` for an empty slice.
///
/// Sorts a copy; the mean of the two middle values is used for even lengths.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::max)
}

/// Round to [`REPORT_PRECISION`] fractional digits
pub fn round_report(value: f64) -> f64 {
    let factor = 10f64.powi(REPORT_PRECISION);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[0.1, 0.2, 0.3]), Some(0.2));
        assert_eq!(median(&[0.3, 0.1, 0.2]), Some(0.2));
    }

    #[test]
    fn test_median_even() {
        let value = median(&[0.4, 0.1, 0.3, 0.2]).unwrap();
        assert_eq!(round_report(value), 0.25);
    }

    #[test]
    fn test_median_single_and_empty() {
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_max() {
        assert_eq!(max(&[0.5, 2.5, 1.0]), Some(2.5));
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_round_report() {
        assert_eq!(round_report(1.1100000000000003), 1.11);
        assert_eq!(round_report(0.12345), 0.123);
        assert_eq!(round_report(100.0), 100.0);
    }
}
