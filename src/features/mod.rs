//! Per-frame feature extraction
//!
//! - Pitch estimation (autocorrelation, subharmonic summation, voicing check)
//! - Chroma aggregation
//! - Chord scoring (24 triads)
//! - Loudness

pub mod chord;
pub mod chroma;
pub mod loudness;
pub mod pitch;

/// Index of the largest value; ties go to the lowest index
///
/// Returns `None` for an empty slice or when every value is NaN.
///
/// # Example
///
/// ```
/// use tonal_dsp::features::argmax;
///
/// assert_eq!(argmax(&[5.0, 5.0, 3.0]), Some(0));
/// assert_eq!(argmax(&[]), None);
/// ```
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_wins() {
        assert_eq!(argmax(&[5.0, 5.0, 3.0]), Some(0));
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[-2.0, -1.0]), Some(1));
        assert_eq!(argmax(&[f32::NAN, 0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
