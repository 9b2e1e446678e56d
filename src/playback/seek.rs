//! Mapping scrub positions and skip deltas to frame indices.
//!
//! Out-of-range input is clamped, never rejected: the results always land on
//! a valid frame in `[0, frame_count - 1]`.

/// Frame for a normalized scrub position (0.0 = start, 1.0 = end)
///
/// NaN is treated as the start of the track.
pub fn position_to_frame(position: f32, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let last = frame_count - 1;
    if position.is_nan() {
        return 0;
    }
    let frame = (position as f64 * frame_count as f64).round();
    frame.clamp(0.0, last as f64) as usize
}

/// Frame reached by moving `delta_secs` (signed) from `current`
pub fn offset_frame(current: usize, delta_secs: f64, sample_rate: u32, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let last = frame_count - 1;
    if !delta_secs.is_finite() {
        return current.min(last);
    }
    let target = current as f64 + (delta_secs * sample_rate as f64).round();
    target.clamp(0.0, last as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_half() {
        assert_eq!(position_to_frame(0.5, 1000), 500);
    }

    #[test]
    fn test_position_clamps() {
        assert_eq!(position_to_frame(1.5, 1000), 999);
        assert_eq!(position_to_frame(1.0, 1000), 999);
        assert_eq!(position_to_frame(-0.2, 1000), 0);
        assert_eq!(position_to_frame(f32::NAN, 1000), 0);
        assert_eq!(position_to_frame(f32::INFINITY, 1000), 999);
    }

    #[test]
    fn test_offset_seconds() {
        // 10s forward at 44.1kHz
        assert_eq!(offset_frame(1000, 10.0, 44100, 10_000_000), 442_000);
        assert_eq!(offset_frame(1000, -30.0, 44100, 10_000_000), 0);
        assert_eq!(offset_frame(1000, 30.0, 44100, 2000), 1999);
        assert_eq!(offset_frame(1000, f64::NAN, 44100, 2000), 1000);
    }
}
