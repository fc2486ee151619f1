//! MAD/Hampel outlier suppression over a sliding window.

use super::stats::median;

/// Replace points whose scaled deviation from the local median exceeds `k`.
/// `"hampel"` replaces with the local median; any other method replaces with
/// the average of the immediate neighbors (clamped at the boundaries).
pub fn filter_outliers(series: &mut [f32], method: &str, k: f32, window: usize) {
    if series.is_empty() || window < 3 {
        return;
    }
    let half = window / 2;
    let n = series.len();
    let original = series.to_vec();
    for i in 0..n {
        let s = i.saturating_sub(half);
        let e = (i + half + 1).min(n);
        let local = &original[s..e];
        let med = median(local);
        let dev: Vec<f32> = local.iter().map(|v| (v - med).abs()).collect();
        let mad = median(&dev).max(1e-6);
        let z = (original[i] - med).abs() / mad;
        if z > k {
            if method == "hampel" {
                series[i] = med;
            } else {
                let left = if i > 0 { original[i - 1] } else { med };
                let right = if i + 1 < n { original[i + 1] } else { med };
                series[i] = 0.5 * (left + right);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_isolated_spike() {
        let mut series = vec![1.0, 1.0, 10.0, 1.0, 1.0];
        filter_outliers(&mut series, "mad", 3.0, 5);
        assert!(series[2] < 5.0, "got {}", series[2]);
    }

    #[test]
    fn leaves_uniform_series_untouched() {
        let mut series = vec![2.0; 10];
        filter_outliers(&mut series, "hampel", 3.0, 5);
        assert_eq!(series, vec![2.0; 10]);
    }
}
