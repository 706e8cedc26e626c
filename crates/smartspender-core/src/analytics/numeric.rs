//! Shared numeric helpers

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (squared deviations divided by N, not N-1)
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[10.0, 12.0, 11.0, 9.0, 200.0]) - 48.4).abs() < 1e-9);
    }

    #[test]
    fn test_population_variance_divides_by_n() {
        // Deviations from 5: -3, -1, 1, 3 -> squares sum to 20, / 4 = 5
        assert!((population_variance(&[2.0, 4.0, 6.0, 8.0]) - 5.0).abs() < 1e-9);
        assert_eq!(population_variance(&[42.0]), 0.0);
        assert_eq!(population_variance(&[]), 0.0);
    }

    #[test]
    fn test_std_dev() {
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
        assert_eq!(std_dev(&[50.0, 50.0, 50.0]), 0.0);
    }
}
