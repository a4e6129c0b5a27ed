use realfft::RealFftPlanner;

/// Spectral-transform capability: magnitude spectrum of a windowed frame.
///
/// The feature extractor depends on this seam rather than on a concrete
/// transform, so tests can substitute a deterministic fake. The production
/// implementation is [`RfftSpectrum`].
pub trait SpectrumAnalyze {
    /// Compute the magnitude spectrum of `frame`.
    ///
    /// `frame` must have even length; the real transform's packing
    /// requires it, and callers truncate odd frames beforehand.
    ///
    /// # Returns
    /// Magnitudes of the non-redundant half, `frame.len() / 2 + 1` bins.
    fn magnitude(&self, frame: &[f32]) -> crate::Result<Vec<f32>>;
}

/// Magnitude spectrum via a real-to-complex FFT.
///
/// A fresh plan is built per call; the analyzer holds no state, so one
/// instance can serve any number of samples without cross-talk.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfftSpectrum;

impl SpectrumAnalyze for RfftSpectrum {
    fn magnitude(&self, frame: &[f32]) -> crate::Result<Vec<f32>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }
        if frame.len() % 2 == 1 {
            return Err(crate::Error::InvalidSize {
                name: "frame",
                value: frame.len(),
                reason: "real FFT input must have even length",
            });
        }
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(frame.len());
        let mut in_buf = frame.to_vec();
        let mut out_buf = r2c.make_output_vec();
        let _ = r2c.process(&mut in_buf, &mut out_buf);
        Ok(out_buf.iter().map(|c| c.norm()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn magnitude_of_dc() {
        let spec = RfftSpectrum.magnitude(&[1.0; 8]).unwrap();
        assert_eq!(spec.len(), 5); // 8/2 + 1
        assert_relative_eq!(spec[0], 8.0, epsilon = 1e-5);
        for &m in &spec[1..] {
            assert!(m < 1e-5);
        }
    }

    #[test]
    fn magnitude_of_nyquist_alternation() {
        let frame = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let spec = RfftSpectrum.magnitude(&frame).unwrap();
        assert_relative_eq!(spec[4], 8.0, epsilon = 1e-5);
        assert!(spec[0] < 1e-5);
    }

    #[test]
    fn odd_frame_is_rejected() {
        assert!(RfftSpectrum.magnitude(&[0.0; 7]).is_err());
    }

    #[test]
    fn empty_frame_yields_empty_spectrum() {
        assert!(RfftSpectrum.magnitude(&[]).unwrap().is_empty());
    }
}
