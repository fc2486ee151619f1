//! Radix-2 iterative FFT, magnitude spectrum, and band energy integration.

use crate::types::Complex32;
use std::f32::consts::PI;

/// Smallest power of two `>= n`.
pub fn next_pow2(n: usize) -> usize {
    let mut p = 1usize;
    while p < n {
        p <<= 1;
    }
    p
}

/// In-place iterative Cooley-Tukey FFT (bit-reversal permutation followed by
/// butterflies); `a.len()` must be a power of two.
pub fn fft_in_place(a: &mut [Complex32]) {
    let n = a.len();
    if n == 0 {
        return;
    }
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }

    let mut len = 2usize;
    while len <= n {
        let angle = -2.0 * PI / len as f32;
        let wlen = Complex32::new(angle.cos(), angle.sin());
        let mut i = 0usize;
        while i < n {
            let mut w = Complex32::new(1.0, 0.0);
            for k in 0..len / 2 {
                let u = a[i + k];
                let v = complex_mul(a[i + k + len / 2], w);
                a[i + k] = u + v;
                a[i + k + len / 2] = Complex32::new(u.re - v.re, u.im - v.im);
                w = complex_mul(w, wlen);
            }
            i += len;
        }
        len <<= 1;
    }
}

fn complex_mul(a: Complex32, b: Complex32) -> Complex32 {
    Complex32::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
}

/// Magnitude spectrum of a real signal: `|X[i]|` for `i` in `[0, N/2)`.
///
/// The transform buffer is always padded to the next power of two
/// internally, since `fft_in_place` requires it regardless of window
/// length; `zero_pad_pow2` only chooses how many leading bins are
/// returned (and therefore which frequency denominator callers should use)
/// — the full padded spectrum when set, or just the unpadded half
/// otherwise.
pub fn magnitude_spectrum(signal: &[f32], zero_pad_pow2: bool) -> Vec<f32> {
    let padded_len = next_pow2(signal.len().max(1));
    let mut data = vec![Complex32::default(); padded_len];
    for (i, &s) in signal.iter().enumerate() {
        data[i] = Complex32::new(s, 0.0);
    }
    fft_in_place(&mut data);
    let n = if zero_pad_pow2 { padded_len } else { signal.len() };
    data[..n / 2].iter().map(|c| c.abs()).collect()
}

/// Sum of squared magnitudes for bins whose physical frequency falls in
/// `[low_hz, high_hz]`.
pub fn band_energy(spectrum: &[f32], sample_rate_hz: f32, low_hz: f32, high_hz: f32, fft_len: usize) -> f32 {
    if spectrum.is_empty() || sample_rate_hz <= 0.0 {
        return 0.0;
    }
    let mut energy = 0.0f32;
    for (i, &s) in spectrum.iter().enumerate() {
        let freq = sample_rate_hz * i as f32 / fft_len as f32;
        if freq >= low_hz && freq <= high_hz {
            energy += s * s;
        }
    }
    energy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_pow2_rounds_up() {
        assert_eq!(next_pow2(0), 1);
        assert_eq!(next_pow2(1), 1);
        assert_eq!(next_pow2(17), 32);
        assert_eq!(next_pow2(32), 32);
    }

    #[test]
    fn sine_peak_lands_in_expected_bin() {
        let fs = 16.0f32;
        let f = 2.0f32;
        let n = 32usize;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * f * i as f32 / fs).sin())
            .collect();
        let spec = magnitude_spectrum(&signal, true);
        let (peak_bin, _) = spec
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        let peak_freq = fs * peak_bin as f32 / n as f32;
        assert!((peak_freq - f).abs() <= fs / n as f32 + 1e-3);
    }

    #[test]
    fn non_power_of_two_length_does_not_panic() {
        let signal: Vec<f32> = (0..20).map(|i| i as f32 * 0.1).collect();
        let spec = magnitude_spectrum(&signal, false);
        assert_eq!(spec.len(), 10);
        assert!(spec.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn band_energy_concentrates_at_signal_frequency() {
        let fs = 16.0f32;
        let f = 2.0f32;
        let n = 32usize;
        let mut signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * f * i as f32 / fs).sin())
            .collect();
        super::super::window::apply_window(&mut signal, "hann");
        let spec = magnitude_spectrum(&signal, true);
        let near = band_energy(&spec, fs, 1.5, 2.5, 32);
        let far = band_energy(&spec, fs, 4.0, 5.0, 32);
        assert!(near > far, "near={near} far={far}");
    }
}
