//! EMA and median smoothing of a 1-D signal.

use super::stats::median;

/// Exponential moving average; `alpha` in `(0, 1]`.
pub fn ema_smooth(x: &[f32], alpha: f32) -> Vec<f32> {
    if x.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0f32; x.len()];
    out[0] = x[0];
    for i in 1..x.len() {
        out[i] = alpha * x[i] + (1.0 - alpha) * out[i - 1];
    }
    out
}

/// Symmetric-kernel median smoothing; edges use only the samples in range.
pub fn median_smooth(x: &[f32], kernel: usize) -> Vec<f32> {
    if x.is_empty() || kernel <= 1 {
        return x.to_vec();
    }
    let radius = (kernel / 2) as isize;
    let n = x.len() as isize;
    (0..n)
        .map(|i| {
            let lo = (i - radius).max(0);
            let hi = (i + radius).min(n - 1);
            let local: Vec<f32> = x[lo as usize..=hi as usize].to_vec();
            median(&local)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_identity_at_alpha_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(ema_smooth(&x, 1.0), x.to_vec());
    }

    #[test]
    fn median_smooth_identity_at_kernel_one() {
        let x = [1.0, 5.0, 2.0, 9.0];
        assert_eq!(median_smooth(&x, 1), x.to_vec());
    }
}
