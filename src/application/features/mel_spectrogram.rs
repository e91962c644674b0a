use std::sync::Arc;

use ndarray::Array2;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::domain::{DecodedSamples, Spectrogram};

use super::FeatureError;

pub const N_MELS: usize = 128;
/// FFT size and analysis window length, in samples.
pub const N_FFT: usize = 2048;
pub const HOP_LENGTH: usize = 512;
pub const F_MIN: f32 = 0.0;
/// Floor applied to power values before taking the logarithm.
pub const AMIN: f32 = 1e-10;
/// Dynamic range kept below the clip's peak, in dB.
pub const TOP_DB: f32 = 80.0;

const N_FREQ: usize = N_FFT / 2 + 1;

/// Log-power mel spectrogram extractor.
///
/// Frames are centered (`N_FFT / 2` zeros on both sides), windowed with a
/// periodic Hann window, and projected onto a Slaney-normalized mel
/// filterbank. A clip of `n` samples yields `1 + n / HOP_LENGTH` frames.
///
/// Power is converted to dB against the maximum of the same clip, so the
/// loudest time-frequency bin is always 0 dB and everything else is clamped
/// to at most `TOP_DB` below it.
pub struct MelSpectrogramExtractor {
    sample_rate: u32,
    /// `[N_MELS, N_FREQ]`
    mel_filters: Array2<f32>,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl MelSpectrogramExtractor {
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(N_FFT);

        let nyquist = sample_rate as f32 / 2.0;

        Self {
            sample_rate,
            mel_filters: mel_filterbank(sample_rate, N_FFT, N_MELS, F_MIN, nyquist),
            window: hann_window(N_FFT),
            fft,
        }
    }

    pub fn frame_count(num_samples: usize) -> usize {
        1 + num_samples / HOP_LENGTH
    }

    pub fn extract(&self, pcm: &DecodedSamples) -> Result<Spectrogram, FeatureError> {
        if pcm.sample_rate() != self.sample_rate {
            return Err(FeatureError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: pcm.sample_rate(),
            });
        }
        if pcm.is_empty() {
            return Err(FeatureError::EmptySignal);
        }

        let power = self.power_spectrogram(pcm.samples());
        let mel = self.mel_filters.dot(&power);
        let log_mel = power_to_db(mel);

        tracing::debug!(
            samples = pcm.len(),
            mel_bands = log_mel.nrows(),
            frames = log_mel.ncols(),
            "Computed log-mel spectrogram"
        );

        Ok(Spectrogram::new(log_mel))
    }

    /// `|STFT|^2` laid out as `[N_FREQ, frames]`.
    fn power_spectrogram(&self, samples: &[f32]) -> Array2<f32> {
        let pad = N_FFT / 2;
        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let n_frames = Self::frame_count(samples.len());
        let mut power = Array2::<f32>::zeros((N_FREQ, n_frames));
        let mut buffer = vec![Complex::new(0.0f32, 0.0); N_FFT];

        for frame in 0..n_frames {
            let start = frame * HOP_LENGTH;
            let segment = &padded[start..start + N_FFT];
            for ((slot, &x), &w) in buffer.iter_mut().zip(segment).zip(&self.window) {
                *slot = Complex::new(x * w, 0.0);
            }

            self.fft.process(&mut buffer);

            for (bin, value) in buffer.iter().take(N_FREQ).enumerate() {
                power[[bin, frame]] = value.norm_sqr();
            }
        }

        power
    }
}

/// `10 * log10(S / max(S))`, floored at `AMIN` and clamped to `TOP_DB`
/// below the peak.
pub fn power_to_db(mut power: Array2<f32>) -> Array2<f32> {
    let reference = power.iter().copied().fold(0.0f32, f32::max).max(AMIN);
    let ref_db = 10.0 * reference.log10();

    power.mapv_inplace(|p| 10.0 * p.max(AMIN).log10() - ref_db);

    let max_db = power.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = max_db - TOP_DB;
    power.mapv_inplace(|db| db.max(floor));
    power
}

fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / len as f64;
            (0.5 - 0.5 * phase.cos()) as f32
        })
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;
    let logstep = 6.4f64.ln() / 27.0;

    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / logstep
    } else {
        hz / F_SP
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;
    let logstep = 6.4f64.ln() / 27.0;

    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (logstep * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Slaney-style triangular filters with area normalization, `[n_mels, n_fft / 2 + 1]`.
fn mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    fmin: f32,
    fmax: f32,
) -> Array2<f32> {
    let n_freq = n_fft / 2 + 1;
    let fft_freqs: Vec<f64> = (0..n_freq)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let mel_min = hz_to_mel(fmin as f64);
    let mel_max = hz_to_mel(fmax as f64);
    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
        .collect();

    let mut filters = Array2::<f32>::zeros((n_mels, n_freq));
    for m in 0..n_mels {
        let (left, center, right) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
        let enorm = 2.0 / (right - left);
        for (k, &freq) in fft_freqs.iter().enumerate() {
            let lower = (freq - left) / (center - left);
            let upper = (right - freq) / (right - center);
            let weight = lower.min(upper).max(0.0);
            filters[[m, k]] = (weight * enorm) as f32;
        }
    }
    filters
}
