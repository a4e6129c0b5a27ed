use martele::onset::{dedupe_onsets, window_grid};
use martele::{AudioSample, SampleConfig};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deduplicated_onsets_keep_the_minimum_gap(
        mut times in prop::collection::vec(0.0f32..100.0, 0..50),
        min_gap in 0.1f32..5.0,
    ) {
        times.sort_by(|a, b| a.total_cmp(b));
        let kept = dedupe_onsets(&times, min_gap);

        for pair in kept.windows(2) {
            prop_assert!(pair[1] - pair[0] >= min_gap);
        }
        // The scan never invents onsets and keeps the earliest candidate.
        prop_assert!(kept.len() <= times.len());
        if let (Some(first_in), Some(first_out)) = (times.first(), kept.first()) {
            prop_assert_eq!(first_in, first_out);
        }
    }

    #[test]
    fn window_grid_is_a_regular_lattice(
        len in 1_000usize..200_000,
        width in 0.05f32..1.0,
        gap in 0.0f32..0.5,
        sr in 8_000u32..48_000,
    ) {
        let margin = 0.25f32;
        let grid = window_grid(len, sr, width, gap, margin).unwrap();

        let step = ((width + gap) * sr as f32).round() as usize;
        let lead_in = (margin * sr as f32).round() as usize;
        for &idx in &grid {
            prop_assert!(idx > lead_in);
            prop_assert!(idx < len);
            prop_assert_eq!(idx % step, 0);
        }
    }

    #[test]
    fn filtering_never_adds_feature_rows(
        loud_windows in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        // 0.1 s windows at 8 kHz, each either loud or near-silent.
        let sr = 8_000u32;
        let window_len = 800usize;
        let mut y = Vec::with_capacity(loud_windows.len() * window_len);
        for &loud in &loud_windows {
            let amp = if loud { 0.5 } else { 0.01 };
            for i in 0..window_len {
                y.push(amp * ((i as f32) * 0.3).sin());
            }
        }

        let config = SampleConfig::new()
            .with_sampling_rate(sr)
            .with_stroke_length(0.1)
            .with_clip_start(false)
            .with_clip_end(false)
            .with_buffer_margin(0.0);
        let mut sample = AudioSample::from_buffer(y, config).unwrap();
        sample.set_stroke_windows(0.1, 0.0).unwrap();

        let n_strokes = sample.strokes().unwrap().len();
        let table = &sample.features().unwrap().table;
        prop_assert!(table.nrows() <= n_strokes);
        prop_assert_eq!(table.ncols(), 2);

        // Every loud window past the first grid index makes exactly one row.
        let expected: usize = loud_windows.iter().skip(1).filter(|&&l| l).count();
        prop_assert_eq!(table.nrows(), expected);
    }
}
