//! FFT-backed spectrum computation.
//!
//! Turns time-domain sample blocks into the dB-scaled magnitude frames the
//! rest of the engine consumes. The FFT plan is created once per analyzer
//! and reused across frames, so per-frame cost stays linear in the frame
//! length.

use std::f32::consts::PI;
use std::sync::Arc;

use roomtone_core::linear_to_db;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Analysis window function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// No windowing
    Rectangular,
    /// Hann window (default for room analysis frames)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
}

impl Window {
    /// Apply the window in place.
    pub fn apply(self, samples: &mut [f32]) {
        let n = samples.len();
        if n < 2 {
            return;
        }
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, s) in samples.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / (n - 1) as f32;
                    *s *= 0.5 * (1.0 - x.cos());
                }
            }
            Window::Hamming => {
                for (i, s) in samples.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / (n - 1) as f32;
                    *s *= 0.54 - 0.46 * x.cos();
                }
            }
            Window::Blackman => {
                for (i, s) in samples.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / (n - 1) as f32;
                    *s *= 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                }
            }
        }
    }
}

/// Convert a bin index to its centre frequency in Hz.
#[inline]
pub fn bin_to_hz(bin: usize, sample_rate: f32, fft_size: usize) -> f32 {
    bin as f32 * sample_rate / fft_size as f32
}

/// Convert a frequency in Hz to the nearest bin index (unclamped).
#[inline]
pub fn hz_to_bin(hz: f32, sample_rate: f32, fft_size: usize) -> usize {
    (hz * fft_size as f32 / sample_rate).round() as usize
}

/// Reusable FFT analyzer producing dB magnitude frames.
pub struct SpectrumAnalyzer {
    fft_size: usize,
    window: Window,
    fft: Arc<dyn Fft<f32>>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for a fixed FFT size.
    pub fn new(fft_size: usize, window: Window) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        Self {
            fft_size,
            window,
            fft,
        }
    }

    /// The FFT size this analyzer was planned for.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute one frequency-domain frame from a sample block.
    ///
    /// The block is zero-padded or truncated to the FFT size, windowed, and
    /// transformed. Returns `fft_size / 2` single-sided magnitudes in dB.
    pub fn db_frame(&self, block: &[f32]) -> Vec<f32> {
        let mut windowed = block.to_vec();
        windowed.resize(self.fft_size, 0.0);
        self.window.apply(&mut windowed);

        let mut buffer: Vec<Complex<f32>> = windowed
            .into_iter()
            .map(|x| Complex::new(x, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        // Single-sided amplitude scaling: 2/N recovers the amplitude of a
        // full-scale sine as 1.0 (0 dB) before window loss.
        let scale = 2.0 / self.fft_size as f32;
        buffer[..self.fft_size / 2]
            .iter()
            .map(|c| linear_to_db(c.norm() * scale))
            .collect()
    }

    /// Split a recording into consecutive non-overlapping blocks and compute
    /// one dB frame per block. A trailing partial block is dropped.
    pub fn db_frames(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        signal
            .chunks_exact(self.fft_size)
            .map(|block| self.db_frame(block))
            .collect()
    }
}

/// Running mean of dB frames, used to build an averaged spectrum snapshot
/// over a recording session.
#[derive(Debug, Clone, Default)]
pub struct AveragedSpectrum {
    sums: Vec<f32>,
    frames: usize,
}

impl AveragedSpectrum {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one dB frame. The first frame fixes the expected length; shorter
    /// or longer frames are clamped to it.
    pub fn push(&mut self, frame: &[f32]) {
        if self.sums.is_empty() {
            self.sums = frame.to_vec();
        } else {
            for (sum, &db) in self.sums.iter_mut().zip(frame) {
                *sum += db;
            }
        }
        self.frames += 1;
    }

    /// Number of frames accumulated so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// The averaged dB spectrum, or `None` if no frames were pushed.
    pub fn mean(&self) -> Option<Vec<f32>> {
        if self.frames == 0 {
            return None;
        }
        let n = self.frames as f32;
        Some(self.sums.iter().map(|&s| s / n).collect())
    }
}
