//! Hann/Hamming tapering windows applied before FFT.

use std::f32::consts::PI;

/// Build an `n`-sample window; `n <= 1` returns all ones.
pub fn build_window(kind: &str, n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f32;
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / denom;
            if kind == "hamming" {
                0.54 - 0.46 * phase.cos()
            } else {
                0.5 * (1.0 - phase.cos())
            }
        })
        .collect()
}

/// Multiply `data` in place by the window named by `kind`.
pub fn apply_window(data: &mut [f32], kind: &str) {
    let win = build_window(kind, data.len());
    for (d, w) in data.iter_mut().zip(win.iter()) {
        *d *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_endpoints_are_zero() {
        let w = build_window("hann", 8);
        assert!(w[0].abs() < 1e-6);
        assert!(w[7].abs() < 1e-6);
    }

    #[test]
    fn degenerate_length_is_ones() {
        assert_eq!(build_window("hann", 1), vec![1.0]);
        assert_eq!(build_window("hann", 0), Vec::<f32>::new());
    }
}
