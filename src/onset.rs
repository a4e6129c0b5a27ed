use crate::window;
use num_complex::Complex32;
use rustfft::FftPlanner;

/// Onset-detection capability: raw attack timestamps for a buffer.
///
/// Implementations return candidate onset times in seconds, ascending.
/// Candidates need not honor any minimum spacing; the sample pipeline
/// deduplicates them against its stroke length afterwards.
pub trait OnsetDetect {
    /// Detect candidate onsets in `y`, sampled at `sr` Hz.
    fn detect(&self, y: &[f32], sr: u32) -> crate::Result<Vec<f32>>;
}

/// Configuration for the spectral-flux onset detector.
///
/// # Example
/// ```
/// use martele::onset::SpectralFluxOnsets;
///
/// let detector = SpectralFluxOnsets::new().with_threshold(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct SpectralFluxOnsets {
    /// FFT window size
    pub n_fft: usize,
    /// Hop length between analysis frames
    pub hop_length: usize,
    /// Peak-picking threshold on the max-normalized flux envelope
    pub threshold: f32,
}

impl SpectralFluxOnsets {
    /// Create a detector with default parameters.
    pub fn new() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            threshold: 0.3,
        }
    }

    /// Set the FFT window size.
    pub fn with_n_fft(mut self, n_fft: usize) -> Self {
        self.n_fft = n_fft;
        self
    }

    /// Set the hop length.
    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = hop_length;
        self
    }

    /// Set the peak-picking threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for SpectralFluxOnsets {
    fn default() -> Self {
        Self::new()
    }
}

impl OnsetDetect for SpectralFluxOnsets {
    fn detect(&self, y: &[f32], sr: u32) -> crate::Result<Vec<f32>> {
        if self.n_fft == 0 {
            return Err(crate::Error::InvalidSize {
                name: "n_fft",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.hop_length == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hop_length",
                value: 0,
                reason: "must be > 0",
            });
        }

        let env = flux_envelope(y, self.n_fft, self.hop_length);
        let peak = env.iter().fold(0.0f32, |m, &v| m.max(v));
        if peak <= 0.0 {
            return Ok(Vec::new());
        }

        let mut times = Vec::new();
        for i in 1..env.len().saturating_sub(1) {
            let v = env[i] / peak;
            if v > self.threshold && env[i] >= env[i - 1] && env[i] > env[i + 1] {
                times.push((i * self.hop_length) as f32 / sr as f32);
            }
        }
        Ok(times)
    }
}

/// Positive spectral flux per analysis frame.
///
/// Frames start at multiples of `hop_length`; a frame's flux is the sum of
/// magnitude increases over the previous frame across all bins, so energy
/// arriving registers and energy decaying does not.
fn flux_envelope(y: &[f32], n_fft: usize, hop_length: usize) -> Vec<f32> {
    if y.len() < n_fft {
        return Vec::new();
    }
    let n_frames = (y.len() - n_fft) / hop_length + 1;
    let n_freq = n_fft / 2 + 1;
    let win = window::hann(n_fft);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_fft);

    let mut env = Vec::with_capacity(n_frames);
    let mut prev_mag = vec![0.0f32; n_freq];
    let mut buffer = vec![Complex32::new(0.0, 0.0); n_fft];

    for t in 0..n_frames {
        let start = t * hop_length;
        for i in 0..n_fft {
            buffer[i] = Complex32::new(y[start + i] * win[i], 0.0);
        }
        fft.process(&mut buffer);

        let mut sum = 0.0f32;
        for f in 0..n_freq {
            let mag = buffer[f].norm();
            sum += (mag - prev_mag[f]).max(0.0);
            prev_mag[f] = mag;
        }
        env.push(sum);
    }
    env
}

/// Deduplicate candidate onsets by a minimum gap.
///
/// Scans left to right; a candidate is kept iff it lies at least `min_gap`
/// seconds after the previously kept onset. The first candidate always
/// survives. Consecutive kept onsets therefore differ by >= `min_gap`.
pub fn dedupe_onsets(times: &[f32], min_gap: f32) -> Vec<f32> {
    let mut kept = Vec::with_capacity(times.len());
    let mut previous = f32::NEG_INFINITY;
    for &t in times {
        if t - previous >= min_gap {
            kept.push(t);
            previous = t;
        }
    }
    kept
}

/// Synthetic onset positions on a regular grid.
///
/// Generates sample indices `0, step, 2*step, ...` below `len`, with
/// `step = round((width + gap) * sr)`, then discards indices that do not
/// lie strictly past the lead-in margin, so no window overlaps the
/// trimmed head of the buffer.
pub fn window_grid(
    len: usize,
    sr: u32,
    width: f32,
    gap: f32,
    margin: f32,
) -> crate::Result<Vec<usize>> {
    let step = ((width + gap) * sr as f32).round() as usize;
    if step == 0 {
        return Err(crate::Error::InvalidParameter {
            name: "window_width",
            value: format!("{} (+ gap {})", width, gap),
            reason: "grid step rounds to zero samples".to_string(),
        });
    }
    let lead_in = (margin * sr as f32).round() as usize;
    Ok((0..len).step_by(step).filter(|&i| i > lead_in).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_spaced_onsets() {
        let times = vec![0.0, 1.5, 3.0];
        assert_eq!(dedupe_onsets(&times, 1.0), times);
    }

    #[test]
    fn dedupe_drops_crowded_onsets() {
        let times = vec![0.0, 0.3, 0.9, 1.0, 2.1];
        assert_eq!(dedupe_onsets(&times, 1.0), vec![0.0, 1.0, 2.1]);
    }

    #[test]
    fn dedupe_always_keeps_the_first() {
        assert_eq!(dedupe_onsets(&[-5.0], 10.0), vec![-5.0]);
    }

    #[test]
    fn grid_is_regular_past_the_margin() {
        // step = round(0.5 * 100) = 50, lead-in = 100 samples
        let grid = window_grid(400, 100, 0.5, 0.0, 1.0).unwrap();
        assert_eq!(grid, vec![150, 200, 250, 300, 350]);
    }

    #[test]
    fn grid_with_zero_margin_drops_only_index_zero() {
        let grid = window_grid(200, 100, 0.5, 0.5, 0.0).unwrap();
        assert_eq!(grid, vec![100]);
    }

    #[test]
    fn degenerate_grid_step_is_an_error() {
        assert!(window_grid(100, 44100, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn flux_detector_rejects_zero_sizes() {
        let y = vec![0.0f32; 4096];
        assert!(SpectralFluxOnsets::new().with_n_fft(0).detect(&y, 44100).is_err());
        assert!(
            SpectralFluxOnsets::new()
                .with_hop_length(0)
                .detect(&y, 44100)
                .is_err()
        );
    }

    #[test]
    fn silence_has_no_onsets() {
        let y = vec![0.0f32; 44100];
        let onsets = SpectralFluxOnsets::new().detect(&y, 44100).unwrap();
        assert!(onsets.is_empty());
    }

    #[test]
    fn short_buffer_has_no_onsets() {
        let y = vec![0.5f32; 100];
        let onsets = SpectralFluxOnsets::new().detect(&y, 44100).unwrap();
        assert!(onsets.is_empty());
    }
}
