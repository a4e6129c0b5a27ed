/// Compute a Hamming window.
///
/// Stroke frames are Hamming-windowed before the magnitude spectrum is
/// taken, so the centroid is not biased by the frame's edge discontinuity.
///
/// # Arguments
/// * `n` - Window length
///
/// # Returns
/// Hamming window of length `n`
pub fn hamming(n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = n as f32;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / m).cos())
        .collect()
}

/// Compute a periodic Hann (raised cosine) window.
///
/// Used by the spectral-flux onset detector for its analysis frames.
///
/// # Arguments
/// * `n` - Window length
///
/// # Returns
/// Hann window of length `n`
pub fn hann(n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = n as f32;
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / m).cos())
        .collect()
}

/// Apply a window to a frame, element-wise.
///
/// The shorter of the two lengths wins; trailing samples of the longer
/// input are dropped.
pub fn apply(frame: &[f32], window: &[f32]) -> Vec<f32> {
    frame
        .iter()
        .zip(window.iter())
        .map(|(s, w)| s * w)
        .collect()
}
