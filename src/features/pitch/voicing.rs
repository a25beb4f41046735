//! Zero-crossing voicing check
//!
//! A periodic signal at `f` Hz crosses zero about `2f` times per second.
//! A much higher crossing rate means the frame is dominated by noise or
//! high-frequency content, and a low pitch estimate for it is discarded.

/// Count sign changes between consecutive samples
///
/// A crossing is `x[j] >= 0 && x[j+1] < 0` or `x[j] <= 0 && x[j+1] > 0`.
pub fn zero_crossings(frame: &[f32]) -> usize {
    frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0 && w[1] < 0.0) || (w[0] <= 0.0 && w[1] > 0.0))
        .count()
}

/// Zero crossings per second
pub fn zero_crossing_rate(frame: &[f32], sample_rate: u32) -> f32 {
    if frame.is_empty() || sample_rate == 0 {
        return 0.0;
    }
    let duration = frame.len() as f32 / sample_rate as f32;
    zero_crossings(frame) as f32 / duration
}

/// True if a pitch estimate of `frequency_hz` is consistent with the frame's
/// zero-crossing rate (`rate <= 2 * frequency_hz`)
pub fn is_voiced(frame: &[f32], sample_rate: u32, frequency_hz: f32) -> bool {
    zero_crossing_rate(frame, sample_rate) <= 2.0 * frequency_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_crossing_rule() {
        assert_eq!(zero_crossings(&[1.0, -1.0, 1.0, -1.0]), 3);
        // touching zero counts on the way out, not on the way in
        assert_eq!(zero_crossings(&[1.0, 0.0, 1.0]), 1);
        assert_eq!(zero_crossings(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(zero_crossings(&[0.5]), 0);
    }

    #[test]
    fn test_noisy_frame_rejects_low_estimate() {
        // alternating samples: 8000 crossings per second at 8 kHz
        let frame: Vec<f32> = (0..800).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        assert!((zero_crossing_rate(&frame, 8000) - 7990.0).abs() < 1.0);
        assert!(!is_voiced(&frame, 8000, 100.0));
        assert!(is_voiced(&frame, 8000, 4000.0));
    }

    #[test]
    fn test_low_sine_is_voiced_at_octave_below() {
        let frame: Vec<f32> = (0..1600)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * (i as f32 + 0.5) / 16000.0).sin())
            .collect();
        // ~200 crossings per second
        assert!(is_voiced(&frame, 16000, 110.0));
        assert!(!is_voiced(&frame, 16000, 50.0));
    }
}
