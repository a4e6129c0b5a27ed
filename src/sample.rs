use crate::clip;
use crate::feature::{self, FEATURE_NAMES};
use crate::onset::{self, OnsetDetect, SpectralFluxOnsets};
use crate::spectrum::{RfftSpectrum, SpectrumAnalyze};
use ndarray::Array2;
use std::path::Path;

/// What to do with a stroke frame whose end runs past the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Yield the short frame as-is.
    #[default]
    Keep,
    /// Zero-pad the frame to the nominal frame length.
    Pad,
    /// Omit the frame; `strokes` may then be shorter than `onset_samples`.
    Drop,
}

/// Construction-time configuration for an [`AudioSample`].
///
/// # Example
/// ```
/// use martele::SampleConfig;
///
/// let config = SampleConfig::new()
///     .with_stroke_length(0.25)
///     .with_good_range((44_100, -44_100));
/// ```
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Sampling rate of the buffer, Hz
    pub sampling_rate: u32,
    /// Stroke frame width, seconds
    pub stroke_length: f32,
    /// Optional keep-range as a `(start, end)` sample-index pair;
    /// negative indices count from the end of the buffer
    pub good_range: Option<(i64, i64)>,
    /// Trim near-silence from the head of the buffer
    pub clip_start: bool,
    /// Trim near-silence from the tail of the buffer
    pub clip_end: bool,
    /// Amplitude above which a sample counts as sound during edge clipping
    pub audio_threshold: f32,
    /// Context kept around the loud region when clipping, seconds
    pub buffer_margin: f32,
    /// Peak amplitude below which a stroke frame is rejected
    pub frame_threshold: f32,
    /// Handling of a trailing frame that runs past the buffer
    pub tail_policy: TailPolicy,
}

impl SampleConfig {
    /// Create a configuration with the default parameters.
    pub fn new() -> Self {
        Self {
            sampling_rate: 44_100,
            stroke_length: 0.5,
            good_range: None,
            clip_start: true,
            clip_end: true,
            audio_threshold: 0.05,
            buffer_margin: 1.0,
            frame_threshold: 0.1,
            tail_policy: TailPolicy::Keep,
        }
    }

    /// Set the sampling rate in Hz.
    pub fn with_sampling_rate(mut self, sampling_rate: u32) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Set the stroke frame width in seconds.
    pub fn with_stroke_length(mut self, stroke_length: f32) -> Self {
        self.stroke_length = stroke_length;
        self
    }

    /// Keep only the given `(start, end)` sample range of the raw buffer.
    pub fn with_good_range(mut self, good_range: (i64, i64)) -> Self {
        self.good_range = Some(good_range);
        self
    }

    /// Enable or disable head trimming.
    pub fn with_clip_start(mut self, clip_start: bool) -> Self {
        self.clip_start = clip_start;
        self
    }

    /// Enable or disable tail trimming.
    pub fn with_clip_end(mut self, clip_end: bool) -> Self {
        self.clip_end = clip_end;
        self
    }

    /// Set the edge-clipping amplitude threshold.
    pub fn with_audio_threshold(mut self, audio_threshold: f32) -> Self {
        self.audio_threshold = audio_threshold;
        self
    }

    /// Set the clipping context margin in seconds.
    pub fn with_buffer_margin(mut self, buffer_margin: f32) -> Self {
        self.buffer_margin = buffer_margin;
        self
    }

    /// Set the stroke-frame silence threshold.
    pub fn with_frame_threshold(mut self, frame_threshold: f32) -> Self {
        self.frame_threshold = frame_threshold;
        self
    }

    /// Set the trailing-frame policy.
    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The final feature table of a sample.
///
/// One row per accepted stroke, in stroke order; columns are fixed to
/// `["zrc", "centroid"]` and never reordered.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Column names, in column order
    pub names: [&'static str; 2],
    /// Feature matrix of shape `(n_good_frames, 2)`
    pub table: Array2<f32>,
}

impl FeatureSet {
    fn empty() -> Self {
        Self {
            names: FEATURE_NAMES,
            table: Array2::zeros((0, 2)),
        }
    }
}

/// One recorded practice take and everything derived from it.
///
/// The buffer is cleaned once at construction (`good_range` slice, then
/// edge clipping) and is immutable afterwards. Derived stages are computed
/// lazily and memoized, advancing strictly forward through
///
/// ```text
/// Loaded -> Clipped -> {OnsetsFound | SyntheticOnsetsSet}
///        -> Segmented -> FeaturesExtracted
/// ```
///
/// Each accessor triggers exactly the missing predecessor stages; no stage
/// runs twice and none is ever un-computed. An unset stage is `None`, a
/// computed one `Some(value)` — accessors match on that state rather than
/// inspecting the values themselves.
///
/// Onset positions come from exactly one source per instance: the injected
/// [`OnsetDetect`] capability (the default), or a synthetic window grid via
/// [`AudioSample::set_stroke_windows`].
pub struct AudioSample {
    config: SampleConfig,
    buffer: Vec<f32>,
    onset_times: Option<Vec<f32>>,
    onset_samples: Option<Vec<usize>>,
    strokes: Option<Vec<Vec<f32>>>,
    features: Option<FeatureSet>,
    detector: Box<dyn OnsetDetect>,
    analyzer: Box<dyn SpectrumAnalyze>,
}

impl AudioSample {
    /// Build a sample from an already-decoded mono buffer.
    ///
    /// Applies the `good_range` slice (malformed ranges are an error,
    /// never silently widened to the full buffer), then edge clipping.
    pub fn from_buffer(buffer: Vec<f32>, config: SampleConfig) -> crate::Result<Self> {
        let sliced = match config.good_range {
            Some(range) => {
                let (start, end) = clip::resolve_range(range, buffer.len())?;
                buffer[start..end].to_vec()
            }
            None => buffer,
        };

        let margin = (config.buffer_margin * config.sampling_rate as f32).round() as usize;
        let (clipped, bounds) = clip::clip_edges(
            &sliced,
            config.audio_threshold,
            margin,
            config.clip_start,
            config.clip_end,
        );
        log::debug!(
            "kept samples {}..{} of {} after edge clipping",
            bounds.0,
            bounds.1,
            sliced.len()
        );

        Ok(Self {
            config,
            buffer: clipped,
            onset_times: None,
            onset_samples: None,
            strokes: None,
            features: None,
            detector: Box::new(SpectralFluxOnsets::new()),
            analyzer: Box::new(RfftSpectrum),
        })
    }

    /// Decode `path` to mono at the configured sampling rate and build a
    /// sample from it. Decode failure is fatal; no partial sample exists.
    pub fn from_file<P: AsRef<Path>>(path: P, config: SampleConfig) -> crate::Result<Self> {
        let buffer = crate::io::load_mono(path, config.sampling_rate)?;
        Self::from_buffer(buffer, config)
    }

    /// Replace the onset-detection capability.
    pub fn with_detector(mut self, detector: Box<dyn OnsetDetect>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the spectral-transform capability.
    pub fn with_analyzer(mut self, analyzer: Box<dyn SpectrumAnalyze>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// The cleaned, immutable buffer.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// The configuration this sample was built with.
    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Stroke frame width in samples.
    pub fn frame_length(&self) -> usize {
        (self.config.stroke_length * self.config.sampling_rate as f32).round() as usize
    }

    /// Set onset positions on a regular grid instead of detecting them.
    ///
    /// Windows are `width` seconds wide and `gap` seconds apart; indices
    /// inside the lead-in margin are discarded. Fails with
    /// [`crate::Error::OnsetsAlreadyComputed`] if an onset source already
    /// ran on this instance.
    pub fn set_stroke_windows(&mut self, width: f32, gap: f32) -> crate::Result<()> {
        if self.onset_times.is_some() {
            return Err(crate::Error::OnsetsAlreadyComputed);
        }
        let sr = self.config.sampling_rate;
        let grid = onset::window_grid(
            self.buffer.len(),
            sr,
            width,
            gap,
            self.config.buffer_margin,
        )?;
        let times = grid.iter().map(|&i| i as f32 / sr as f32).collect();
        log::debug!("set {} synthetic onset windows", grid.len());
        self.onset_times = Some(times);
        self.onset_samples = Some(grid);
        Ok(())
    }

    /// Deduplicated onset times in seconds, detecting them if needed.
    ///
    /// Consecutive values differ by at least `2 * stroke_length`.
    pub fn onset_times(&mut self) -> crate::Result<&[f32]> {
        if self.onset_times.is_none() {
            self.compute_onsets()?;
        }
        Ok(self.onset_times.as_deref().unwrap_or(&[]))
    }

    /// Onset positions as sample indices, aligned with `onset_times`.
    pub fn onset_samples(&mut self) -> crate::Result<&[usize]> {
        if self.onset_samples.is_none() {
            self.compute_onsets()?;
        }
        Ok(self.onset_samples.as_deref().unwrap_or(&[]))
    }

    /// Raw stroke frames, one per onset, segmenting if needed.
    ///
    /// Under [`TailPolicy::Drop`] a trailing frame may be omitted; under
    /// the other policies frames align 1:1 with `onset_samples`.
    pub fn strokes(&mut self) -> crate::Result<&[Vec<f32>]> {
        if self.strokes.is_none() {
            self.compute_strokes()?;
        }
        Ok(self.strokes.as_deref().unwrap_or(&[]))
    }

    /// The feature table over quality-passing strokes, extracting if
    /// needed. Zero accepted strokes yield an empty `(0, 2)` table.
    pub fn features(&mut self) -> crate::Result<&FeatureSet> {
        if self.features.is_none() {
            self.compute_features()?;
        }
        Ok(self.features.get_or_insert_with(FeatureSet::empty))
    }

    fn compute_onsets(&mut self) -> crate::Result<()> {
        let sr = self.config.sampling_rate;
        let candidates = self.detector.detect(&self.buffer, sr)?;
        let times = onset::dedupe_onsets(&candidates, 2.0 * self.config.stroke_length);
        log::debug!(
            "kept {} of {} candidate onsets",
            times.len(),
            candidates.len()
        );
        let samples = times
            .iter()
            .map(|&t| (t * sr as f32).round() as usize)
            .collect();
        self.onset_times = Some(times);
        self.onset_samples = Some(samples);
        Ok(())
    }

    fn compute_strokes(&mut self) -> crate::Result<()> {
        if self.onset_samples.is_none() {
            self.compute_onsets()?;
        }
        let frame_len = self.frame_length();
        let starts = self.onset_samples.as_deref().unwrap_or(&[]);

        let mut strokes = Vec::with_capacity(starts.len());
        for &start in starts {
            let end = start + frame_len;
            if end <= self.buffer.len() {
                strokes.push(self.buffer[start..end].to_vec());
                continue;
            }
            let tail = self.buffer.get(start..).unwrap_or(&[]);
            match self.config.tail_policy {
                TailPolicy::Keep => strokes.push(tail.to_vec()),
                TailPolicy::Pad => {
                    let mut frame = tail.to_vec();
                    frame.resize(frame_len, 0.0);
                    strokes.push(frame);
                }
                TailPolicy::Drop => {}
            }
        }
        self.strokes = Some(strokes);
        Ok(())
    }

    fn compute_features(&mut self) -> crate::Result<()> {
        if self.strokes.is_none() {
            self.compute_strokes()?;
        }
        let strokes = self.strokes.as_deref().unwrap_or(&[]);

        let mut rows = Vec::new();
        let mut n_good = 0usize;
        for frame in strokes {
            if !feature::frame_is_good(frame, self.config.frame_threshold) {
                continue;
            }
            let [zrc, centroid] = feature::frame_features(frame, self.analyzer.as_ref())?;
            rows.push(zrc);
            rows.push(centroid);
            n_good += 1;
        }
        log::debug!("extracted features for {} of {} strokes", n_good, strokes.len());

        let table =
            Array2::from_shape_vec((n_good, 2), rows).map_err(|_| crate::Error::InvalidSize {
                name: "feature_table",
                value: n_good,
                reason: "row layout mismatch",
            })?;
        self.features = Some(FeatureSet {
            names: FEATURE_NAMES,
            table,
        });
        Ok(())
    }
}
