//! Stroke Extraction Example
//!
//! Decodes a recording, segments it into bow strokes, and prints the
//! feature table.
//!
//! Usage: cargo run --example extract_strokes -- <audio-file>

use log::info;
use martele::{AudioSample, SampleConfig};

fn main() -> martele::Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: extract_strokes <audio-file>");
        std::process::exit(2);
    });

    info!("Loading {path}");
    let config = SampleConfig::new();
    let mut sample = AudioSample::from_file(&path, config)?;

    info!(
        "Clipped buffer: {} samples ({:.2} s)",
        sample.buffer().len(),
        sample.buffer().len() as f32 / sample.config().sampling_rate as f32
    );

    let times = sample.onset_times()?.to_vec();
    info!("Detected {} strokes", times.len());
    for (i, t) in times.iter().enumerate() {
        info!("  stroke {}: {:.3}s", i + 1, t);
    }

    let features = sample.features()?;
    println!("{:>10} {:>10}", features.names[0], features.names[1]);
    for row in features.table.rows() {
        println!("{:>10.4} {:>10.1}", row[0], row[1]);
    }
    Ok(())
}
