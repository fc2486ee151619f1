//! Median and timestamp-jitter primitives shared by the rest of `dsp`.

/// Sorted-copy median; even lengths average the two middle elements.
pub fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let m = v.len() / 2;
    if v.len() % 2 == 0 {
        0.5 * (v[m - 1] + v[m])
    } else {
        v[m]
    }
}

/// Median inter-arrival interval, in seconds, over a timestamp series.
pub fn median_delta_seconds(timestamps_ns: &[u64]) -> f32 {
    if timestamps_ns.len() < 2 {
        return 0.0;
    }
    let deltas: Vec<f32> = timestamps_ns
        .windows(2)
        .map(|w| (w[1] - w[0]) as f32 / 1e9)
        .collect();
    median(&deltas)
}

/// Largest relative deviation of any inter-arrival interval from the median.
pub fn jitter_ratio(timestamps_ns: &[u64], median_dt: f32) -> f32 {
    if timestamps_ns.len() < 2 || median_dt <= 0.0 {
        return 0.0;
    }
    timestamps_ns
        .windows(2)
        .map(|w| {
            let dt = (w[1] - w[0]) as f32 / 1e9;
            (dt - median_dt).abs() / median_dt
        })
        .fold(0.0f32, f32::max)
}
