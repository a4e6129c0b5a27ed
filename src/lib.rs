//! Bow-stroke segmentation and feature extraction for monophonic string
//! recordings.
//!
//! Martele takes a recorded practice take (one instrument, one channel),
//! cleans it up, finds the bow attacks, cuts a fixed-length frame per
//! attack, and reduces every frame that is loud enough to a two-value
//! feature vector for downstream comparison or classification. The whole
//! pipeline lives in one stateful entity, [`AudioSample`]:
//!
//! ```text
//! buffer -> edge clipping -> onset detection + dedup -> stroke frames
//!        -> quality filter -> (zrc, centroid) feature table
//! ```
//!
//! Stages are lazy and memoized: each accessor computes exactly the
//! missing predecessor stages, and nothing runs twice.
//!
//! # Quick Start
//!
//! ```rust
//! use martele::{AudioSample, SampleConfig};
//!
//! // One second of silence, then half a second of a 220 Hz tone.
//! let sr = 44_100u32;
//! let mut y = vec![0.0f32; sr as usize];
//! y.extend(martele::io::tone(220.0, sr, 0.5).iter().map(|s| 0.4 * s));
//!
//! let config = SampleConfig::new()
//!     .with_clip_start(false)
//!     .with_clip_end(false)
//!     .with_buffer_margin(0.0);
//! let mut sample = AudioSample::from_buffer(y, config).unwrap();
//!
//! // Segment on a fixed grid instead of detecting onsets.
//! sample.set_stroke_windows(0.5, 0.0).unwrap();
//! let features = sample.features().unwrap();
//!
//! // The silent window is rejected; the tone window makes one row.
//! assert_eq!(features.names, ["zrc", "centroid"]);
//! assert_eq!(features.table.shape(), &[1, 2]);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`sample`] | The [`AudioSample`] pipeline entity and its configuration |
//! | [`clip`] | Keep-range resolution and edge clipping |
//! | [`onset`] | Onset-detection capability, deduplication, synthetic grids |
//! | [`feature`] | Zero-crossing rate, spectral centroid, frame quality |
//! | [`spectrum`] | Magnitude-spectrum capability |
//! | [`window`] | Hamming and Hann windows |
//! | [`io`] | Decoding to mono, resampling, WAV fixtures, test signals |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Degenerate inputs (no onsets, all
//! frames rejected) are valid empty outputs, not errors; malformed
//! configuration (an unresolvable `good_range`, a zero-width window grid)
//! is reported, never silently papered over.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod clip;
pub mod feature;
pub mod io;
pub mod onset;
pub mod sample;
pub mod spectrum;
pub mod window;

pub use sample::{AudioSample, FeatureSet, SampleConfig, TailPolicy};
