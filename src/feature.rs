use crate::spectrum::SpectrumAnalyze;
use crate::window;

/// Column order of every feature table produced by this crate.
pub const FEATURE_NAMES: [&str; 2] = ["zrc", "centroid"];

/// Upper edge of the centroid's analysis range in Hz.
///
/// Spectrum bins are mapped linearly onto `0..=CENTROID_RANGE_HZ`
/// regardless of frame length, so centroids from different recordings are
/// directly comparable.
pub const CENTROID_RANGE_HZ: f32 = 22_050.0;

/// Compute the zero-crossing rate of a frame.
///
/// The fraction of sample intervals in which the signal changes sign.
/// Bow noise pushes this up; a clean sustained pitch keeps it low.
///
/// # Example
/// ```
/// use martele::feature::zero_crossing_rate;
///
/// let frame = vec![1.0, -1.0, 1.0, -1.0]; // alternates every sample
/// assert_eq!(zero_crossing_rate(&frame), 1.0);
/// ```
pub fn zero_crossing_rate(y: &[f32]) -> f32 {
    if y.len() < 2 {
        return 0.0;
    }
    let mut count = 0usize;
    for i in 1..y.len() {
        let prev = y[i - 1];
        let curr = y[i];
        if (prev >= 0.0 && curr < 0.0) || (prev < 0.0 && curr >= 0.0) {
            count += 1;
        }
    }
    count as f32 / (y.len() - 1) as f32
}

/// Spectral centroid of a magnitude spectrum over a fixed analysis range.
///
/// Bin `i` is assigned the frequency `range * i / (len - 1)`; the centroid
/// is the magnitude-weighted mean of those frequencies, 0.0 for a silent
/// or single-bin spectrum.
pub fn spectral_centroid(spectrum: &[f32], range: f32) -> f32 {
    if spectrum.len() < 2 {
        return 0.0;
    }
    let bin_width = range / (spectrum.len() - 1) as f32;
    let mut weighted = 0.0f32;
    let mut total = 0.0f32;
    for (i, &mag) in spectrum.iter().enumerate() {
        weighted += i as f32 * bin_width * mag;
        total += mag;
    }
    if total > 1e-10 {
        weighted / total
    } else {
        0.0
    }
}

/// Peak absolute amplitude of a frame.
pub fn peak_amplitude(y: &[f32]) -> f32 {
    y.iter().fold(0.0f32, |m, v| m.max(v.abs()))
}

/// Frame quality predicate: loud enough to carry a stroke.
///
/// A frame whose peak amplitude stays below `threshold` is considered
/// silence that the onset source mislabeled, and produces no feature row.
pub fn frame_is_good(y: &[f32], threshold: f32) -> bool {
    peak_amplitude(y) >= threshold
}

/// Extract the ordered feature pair `(zrc, centroid)` from one frame.
///
/// Odd-length frames are truncated by one sample first; the real
/// transform needs even input, and both features are computed on the
/// truncated frame so parity never changes a value. The frame is
/// Hamming-windowed before the magnitude spectrum is taken.
pub fn frame_features(frame: &[f32], analyzer: &dyn SpectrumAnalyze) -> crate::Result<[f32; 2]> {
    let even_len = frame.len() - frame.len() % 2;
    let frame = &frame[..even_len];

    let zrc = zero_crossing_rate(frame);
    let windowed = window::apply(frame, &window::hamming(frame.len()));
    let spectrum = analyzer.magnitude(&windowed)?;
    let centroid = spectral_centroid(&spectrum, CENTROID_RANGE_HZ);
    Ok([zrc, centroid])
}
