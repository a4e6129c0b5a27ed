//! Edge cleaning for raw practice takes.
//!
//! Recordings start with the performer reaching for the instrument and end
//! with them reaching for the stop button. `resolve_range` applies an
//! explicit keep-range, then `clip_edges` trims near-silence from both
//! ends, leaving a margin of context around the first and last loud sample.

/// Resolve a `(start, end)` sample-index pair against a buffer length.
///
/// Either index may be negative, meaning an offset from the end of the
/// buffer. A pair that cannot be resolved is a configuration error, never
/// silently replaced by the full buffer.
///
/// # Example
/// ```
/// use martele::clip::resolve_range;
///
/// assert_eq!(resolve_range((10, -20), 100).unwrap(), (10, 80));
/// assert!(resolve_range((95000, -400000), 100_000).is_err());
/// ```
pub fn resolve_range(range: (i64, i64), len: usize) -> crate::Result<(usize, usize)> {
    let (raw_start, raw_end) = range;
    let resolve = |idx: i64| -> Option<usize> {
        let resolved = if idx < 0 { idx + len as i64 } else { idx };
        if (0..=len as i64).contains(&resolved) {
            Some(resolved as usize)
        } else {
            None
        }
    };

    let start = resolve(raw_start).ok_or(crate::Error::InvalidRange {
        start: raw_start,
        end: raw_end,
        len,
        reason: "start index falls outside the buffer",
    })?;
    let end = resolve(raw_end).ok_or(crate::Error::InvalidRange {
        start: raw_start,
        end: raw_end,
        len,
        reason: "end index falls outside the buffer",
    })?;
    if start > end {
        return Err(crate::Error::InvalidRange {
            start: raw_start,
            end: raw_end,
            len,
            reason: "resolved start lies past resolved end",
        });
    }
    Ok((start, end))
}

/// Trim near-silence from the edges of a buffer.
///
/// If `clip_start`, everything before the first sample whose amplitude
/// exceeds `threshold` is dropped, minus `margin` samples of kept context
/// (floored at the buffer start). If `clip_end`, the symmetric trim runs
/// from the tail with the margin added back. A buffer in which no sample
/// exceeds `threshold` is returned untouched.
///
/// # Arguments
/// * `y` - Input buffer
/// * `threshold` - Amplitude above which a sample counts as sound
/// * `margin` - Context samples kept on either side of the loud region
/// * `clip_start` / `clip_end` - Which edges to trim
///
/// # Returns
/// The trimmed buffer and the `(start, end)` bounds it occupied in `y`.
pub fn clip_edges(
    y: &[f32],
    threshold: f32,
    margin: usize,
    clip_start: bool,
    clip_end: bool,
) -> (Vec<f32>, (usize, usize)) {
    let mut start = 0usize;
    let mut end = y.len();

    let first_loud = y.iter().position(|v| v.abs() > threshold);
    let last_loud = y.iter().rposition(|v| v.abs() > threshold);

    if let (Some(first), Some(last)) = (first_loud, last_loud) {
        if clip_start {
            start = first.saturating_sub(margin);
        }
        if clip_end {
            end = (last + 1 + margin).min(y.len());
        }
    }

    (y[start..end].to_vec(), (start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_full_buffer() {
        assert_eq!(resolve_range((0, 100), 100).unwrap(), (0, 100));
    }

    #[test]
    fn resolve_negative_indices() {
        assert_eq!(resolve_range((-50, -10), 100).unwrap(), (50, 90));
    }

    #[test]
    fn reversed_range_is_an_error() {
        assert!(resolve_range((80, 20), 100).is_err());
    }

    #[test]
    fn clip_both_edges_with_margin() {
        let mut y = vec![0.0f32; 100];
        y.extend(vec![0.5f32; 50]);
        y.extend(vec![0.0f32; 100]);

        let (clipped, (start, end)) = clip_edges(&y, 0.05, 20, true, true);
        assert_eq!(start, 80);
        assert_eq!(end, 170);
        assert_eq!(clipped.len(), 90);
    }

    #[test]
    fn margin_floors_at_buffer_start() {
        let mut y = vec![0.0f32; 5];
        y.extend(vec![0.5f32; 10]);

        let (_, (start, _)) = clip_edges(&y, 0.05, 20, true, true);
        assert_eq!(start, 0);
    }

    #[test]
    fn silent_buffer_is_untouched() {
        let y = vec![0.0f32; 64];
        let (clipped, bounds) = clip_edges(&y, 0.05, 10, true, true);
        assert_eq!(clipped.len(), 64);
        assert_eq!(bounds, (0, 64));
    }

    #[test]
    fn clipping_disabled_is_identity() {
        let mut y = vec![0.0f32; 30];
        y.extend(vec![0.9f32; 10]);
        let (clipped, bounds) = clip_edges(&y, 0.05, 5, false, false);
        assert_eq!(clipped, y);
        assert_eq!(bounds, (0, 40));
    }
}
