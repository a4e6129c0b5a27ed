use martele::onset::{dedupe_onsets, OnsetDetect, SpectralFluxOnsets};
use martele::{AudioSample, SampleConfig};

/// 5 s of silence with 0.3 s tone bursts at the given times.
fn burst_signal(sr: u32, burst_starts: &[f32]) -> Vec<f32> {
    let mut y = vec![0.0f32; 5 * sr as usize];
    let burst = martele::io::tone(440.0, sr, 0.3);
    for &start in burst_starts {
        let offset = (start * sr as f32) as usize;
        for (i, s) in burst.iter().enumerate() {
            if offset + i < y.len() {
                y[offset + i] = 0.6 * s;
            }
        }
    }
    y
}

#[test]
fn flux_detector_finds_each_attack() {
    let sr = 44_100;
    let starts = [1.0f32, 2.5, 4.0];
    let y = burst_signal(sr, &starts);

    let onsets = SpectralFluxOnsets::new().detect(&y, sr).unwrap();
    assert_eq!(onsets.len(), starts.len());
    for (detected, expected) in onsets.iter().zip(starts.iter()) {
        assert!(
            (detected - expected).abs() < 0.1,
            "onset at {detected}, expected near {expected}"
        );
    }
}

#[test]
fn detected_onsets_honor_the_minimum_gap() {
    let sr = 44_100;
    let y = burst_signal(sr, &[1.0, 2.5, 4.0]);

    let config = SampleConfig::new()
        .with_clip_start(false)
        .with_clip_end(false);
    let min_gap = 2.0 * config.stroke_length;
    let mut sample = AudioSample::from_buffer(y, config).unwrap();

    let times = sample.onset_times().unwrap();
    assert!(!times.is_empty());
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= min_gap);
    }
}

#[test]
fn crowded_attacks_collapse_to_the_first() {
    // Bursts 0.4 s apart with stroke_length 0.5 require 1.0 s spacing.
    let sr = 44_100;
    let y = burst_signal(sr, &[1.0, 1.4, 1.8, 3.5]);

    let config = SampleConfig::new()
        .with_clip_start(false)
        .with_clip_end(false);
    let mut sample = AudioSample::from_buffer(y, config).unwrap();

    let times = sample.onset_times().unwrap().to_vec();
    assert_eq!(times.len(), 2);
    assert!((times[0] - 1.0).abs() < 0.1);
    assert!((times[1] - 3.5).abs() < 0.1);
}

#[test]
fn dedupe_is_a_left_to_right_greedy_scan() {
    // 0.9 survives because 0.4 was discarded, not kept as the anchor.
    let kept = dedupe_onsets(&[0.0, 0.4, 0.9, 1.2], 0.8);
    assert_eq!(kept, vec![0.0, 0.9]);
}

#[test]
fn onset_samples_align_with_times() {
    let sr = 44_100;
    let y = burst_signal(sr, &[1.0, 3.0]);

    let config = SampleConfig::new()
        .with_clip_start(false)
        .with_clip_end(false);
    let mut sample = AudioSample::from_buffer(y, config).unwrap();

    let times = sample.onset_times().unwrap().to_vec();
    let samples = sample.onset_samples().unwrap().to_vec();
    assert_eq!(times.len(), samples.len());
    for (t, s) in times.iter().zip(samples.iter()) {
        assert_eq!(*s, (t * sr as f32).round() as usize);
    }
}
