//! Jitter gating metric and uniform-grid resampling.

use super::stats::median;

/// Standard deviation of inter-arrival intervals divided by their median;
/// used to gate windows whose timing is too irregular to trust.
pub fn jitter_metric(timestamps_ns: &[u64]) -> f32 {
    if timestamps_ns.len() < 3 {
        return 0.0;
    }
    let dt: Vec<f32> = timestamps_ns
        .windows(2)
        .map(|w| (w[1] - w[0]) as f32 / 1e9)
        .collect();
    let med = median(&dt);
    if med <= 0.0 {
        return 1.0;
    }
    let mean = dt.iter().sum::<f32>() / dt.len() as f32;
    let var = dt.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / dt.len() as f32;
    var.sqrt() / med
}

/// Resample `samples` onto a uniform time grid whose step is the median
/// inter-arrival interval. Output has the same length as the input and
/// starts at `timestamps_ns[0]`; this intentionally drops a small suffix
/// when the derived step is smaller than the average spacing.
pub fn resample_to_uniform_grid(timestamps_ns: &[u64], samples: &[f32], method: &str) -> Vec<f32> {
    if timestamps_ns.len() != samples.len() || samples.len() < 2 {
        return samples.to_vec();
    }

    let mut dtns: Vec<u64> = timestamps_ns.windows(2).map(|w| w[1] - w[0]).collect();
    dtns.sort_unstable();
    let step = dtns[dtns.len() / 2];

    let mut out = vec![0.0f32; samples.len()];
    let mut src = 0usize;
    for (i, slot) in out.iter_mut().enumerate() {
        let t = timestamps_ns[0] + i as u64 * step;
        while src + 1 < timestamps_ns.len() && timestamps_ns[src + 1] < t {
            src += 1;
        }
        if src + 1 >= timestamps_ns.len() {
            *slot = *samples.last().unwrap();
            continue;
        }
        if method == "nearest" {
            let dl = t - timestamps_ns[src];
            let dr = timestamps_ns[src + 1] - t;
            *slot = if dl <= dr { samples[src] } else { samples[src + 1] };
            continue;
        }
        let t0 = timestamps_ns[src] as f32;
        let t1 = timestamps_ns[src + 1] as f32;
        let a = (t as f32 - t0) / (t1 - t0 + 1e-9);
        *slot = samples[src] + a * (samples[src + 1] - samples[src]);
    }
    out
}
