//! Stateful sliding-window engine: turns one `Frame` at a time into an
//! optional `Decision`, orchestrating the DSP primitives per the per-frame
//! protocol.

use std::time::Instant;

use crate::config::Config;
use crate::dsp::{fft, outlier, phase, resample, smoothing, topk, window as dsp_window};
use crate::error::{AetherError, Result};
use crate::runtime::decision::DecisionEngine;
use crate::runtime::metrics::RuntimeMetrics;
use crate::types::{Decision, Frame, FrameSignals, Window};

pub struct Pipeline {
    cfg: Config,
    window: Window,
    decision_engine: DecisionEngine,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Self {
        let window = Window::new(cfg.dsp.window_frames);
        let decision_engine = DecisionEngine::new(
            cfg.decision.threshold_on,
            cfg.decision.threshold_off,
            cfg.decision.hold_frames,
        );
        Self {
            cfg,
            window,
            decision_engine,
        }
    }

    fn frame_signals(frame: &Frame) -> FrameSignals {
        let sc_count = frame.subcarrier_count as usize;
        let rx = frame.rx_count as usize;
        let tx = frame.tx_count as usize;
        let mut amplitude_by_sc = vec![0.0f32; sc_count];
        let mut phase_by_sc = vec![0.0f32; sc_count];
        for sc in 0..sc_count {
            let mut amp_sum = 0.0f32;
            let mut re_sum = 0.0f32;
            let mut im_sum = 0.0f32;
            for r in 0..rx {
                for t in 0..tx {
                    let sample = frame.sample(r, t, sc);
                    amp_sum += sample.abs();
                    re_sum += sample.re;
                    im_sum += sample.im;
                }
            }
            let link_count = (rx * tx).max(1) as f32;
            amplitude_by_sc[sc] = amp_sum / link_count;
            phase_by_sc[sc] = im_sum.atan2(re_sum);
        }
        FrameSignals {
            timestamp_ns: frame.timestamp_ns,
            amplitude_by_sc,
            phase_by_sc,
        }
    }

    fn transpose(&self) -> (Vec<u64>, Vec<Vec<f32>>, Vec<Vec<f32>>) {
        let sc_count = self.window.last_subcarrier_count().unwrap_or(0);
        let mut timestamps = Vec::with_capacity(self.window.len());
        let mut amplitude_by_sc = vec![Vec::with_capacity(self.window.len()); sc_count];
        let mut phase_by_sc = vec![Vec::with_capacity(self.window.len()); sc_count];
        for entry in self.window.iter() {
            timestamps.push(entry.timestamp_ns);
            for sc in 0..sc_count {
                amplitude_by_sc[sc].push(entry.amplitude_by_sc[sc]);
                phase_by_sc[sc].push(entry.phase_by_sc[sc]);
            }
        }
        (timestamps, amplitude_by_sc, phase_by_sc)
    }

    /// Run the per-frame protocol. Returns `None` while the window is
    /// filling, was cleared by a shape change, or was rejected for jitter.
    pub fn process(&mut self, frame: &Frame, metrics: &mut RuntimeMetrics) -> Result<Option<Decision>> {
        let started = Instant::now();

        if frame.data.is_empty() {
            return Err(AetherError::InvalidArgument("frame.data cannot be empty".to_string()));
        }

        if let Some(last_sc) = self.window.last_subcarrier_count() {
            if last_sc != frame.subcarrier_count as usize {
                self.window.clear();
                metrics.shape_change_total += 1;
                return Ok(None);
            }
        }

        let signals = Self::frame_signals(frame);
        self.window.push(signals);
        metrics.window_fill_ratio = self.window.fill_ratio();

        if !self.window.is_full() {
            return Ok(None);
        }

        let (timestamps, amplitude_by_sc, mut phase_by_sc) = self.transpose();

        let median_dt = crate::dsp::stats::median_delta_seconds(&timestamps);
        let jitter = resample::jitter_metric(&timestamps);
        if jitter > self.cfg.dsp.resampling.reject_jitter_ratio {
            metrics.windows_rejected_total += 1;
            return Ok(None);
        }

        phase::remove_common_phase_error(&mut phase_by_sc, true);
        for series in phase_by_sc.iter_mut() {
            let mut resampled =
                resample::resample_to_uniform_grid(&timestamps, series, &self.cfg.dsp.resampling.method);
            outlier::filter_outliers(
                &mut resampled,
                &self.cfg.dsp.outlier.method,
                self.cfg.dsp.outlier.k,
                self.cfg.dsp.outlier.window,
            );
            let unwrapped = phase::unwrap_phase(&resampled);
            *series = phase::detrend(&unwrapped);
        }

        let topk_indices = topk::topk_variance(&amplitude_by_sc, self.cfg.dsp.topk_subcarriers);
        let w = self.window.capacity();
        let mut signal = vec![0.0f32; w];
        if !topk_indices.is_empty() {
            for t in 0..w {
                let sum: f32 = topk_indices.iter().map(|&sc| phase_by_sc[sc][t]).sum();
                signal[t] = sum / topk_indices.len() as f32;
            }
        }

        let smoothed = match self.cfg.dsp.smoothing.kind.as_str() {
            "median" => smoothing::median_smooth(&signal, self.cfg.dsp.smoothing.kernel),
            _ => smoothing::ema_smooth(&signal, self.cfg.dsp.smoothing.alpha),
        };

        let sample_rate = if median_dt > 0.0 { 1.0 / median_dt } else { 0.0 };
        let mut windowed = smoothed.clone();
        dsp_window::apply_window(&mut windowed, &self.cfg.dsp.fft.window);
        let spectrum = fft::magnitude_spectrum(&windowed, self.cfg.dsp.fft.zero_pad_pow2);
        let fft_len = if self.cfg.dsp.fft.zero_pad_pow2 {
            fft::next_pow2(w)
        } else {
            w
        };

        let energy_motion = fft::band_energy(
            &spectrum,
            sample_rate,
            self.cfg.dsp.bands.motion.low_hz,
            self.cfg.dsp.bands.motion.high_hz,
            fft_len,
        );
        let energy_breathing = if self.cfg.dsp.bands.breathing.enabled {
            fft::band_energy(
                &spectrum,
                sample_rate,
                self.cfg.dsp.bands.breathing.low_hz,
                self.cfg.dsp.bands.breathing.high_hz,
                fft_len,
            )
        } else {
            0.0
        };

        let present = self.decision_engine.update(energy_motion).is_present();

        let elapsed_us = started.elapsed().as_micros().min(u64::MAX as u128) as u64;
        metrics.record_latency_us(elapsed_us);
        metrics.frames_processed_total += 1;

        Ok(Some(Decision {
            timestamp_ns: frame.timestamp_ns,
            energy_motion: if energy_motion.is_finite() { energy_motion } else { 0.0 },
            energy_breathing: if energy_breathing.is_finite() { energy_breathing } else { 0.0 },
            present,
        }))
    }
}
