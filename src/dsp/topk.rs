//! Top-K subcarrier selection by time-series variance.

/// Indices of the `min(k, len)` subcarriers with the highest variance,
/// descending by variance with ties broken by ascending index.
pub fn topk_variance(series_by_sc: &[Vec<f32>], k: usize) -> Vec<usize> {
    let mut variance_index: Vec<(f32, usize)> = series_by_sc
        .iter()
        .enumerate()
        .map(|(sc, s)| {
            if s.is_empty() {
                return (0.0, sc);
            }
            let mean = s.iter().sum::<f32>() / s.len() as f32;
            let var = s.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / s.len() as f32;
            (var, sc)
        })
        .collect();

    variance_index.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then(a.1.cmp(&b.1)));
    let k = k.min(variance_index.len());
    variance_index[..k].iter().map(|(_, idx)| *idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_highest_variance_subcarriers() {
        let series = vec![
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 3.0, 1.0, 3.0],
            vec![1.0, 6.0, 1.0, 6.0],
            vec![1.0, 2.0, 1.0, 2.0],
        ];
        assert_eq!(topk_variance(&series, 2), vec![2, 1]);
    }

    #[test]
    fn k_is_clamped_to_series_count() {
        let series = vec![vec![1.0, 2.0], vec![3.0, 1.0]];
        assert_eq!(topk_variance(&series, 10).len(), 2);
    }
}
