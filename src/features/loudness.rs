//! Frame loudness
//!
//! RMS level of the raw frame in dB relative to full scale, floored at
//! [`DB_FLOOR`](crate::spectral::DB_FLOOR) for silent frames.

use crate::spectral::amplitude_to_db;

/// Root mean square of a frame (0 for an empty frame)
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = frame.iter().map(|x| x * x).sum();
    (sum_sq / frame.len() as f32).sqrt()
}

/// RMS level in dBFS
pub fn rms_db(frame: &[f32]) -> f32 {
    amplitude_to_db(rms(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::DB_FLOOR;

    #[test]
    fn test_full_scale_square_is_0db() {
        let frame: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(rms_db(&frame).abs() < 1e-4);
    }

    #[test]
    fn test_sine_rms() {
        let frame: Vec<f32> = (0..1600)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 16000.0).sin())
            .collect();
        assert!((rms(&frame) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        assert!((rms_db(&frame) + 3.0103).abs() < 0.01);
    }

    #[test]
    fn test_silence_hits_floor() {
        assert!((rms_db(&[0.0; 64]) - DB_FLOOR).abs() < 1e-3);
        assert!((rms_db(&[]) - DB_FLOOR).abs() < 1e-3);
    }
}
