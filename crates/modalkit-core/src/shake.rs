#![forbid(unsafe_code)]

//! Rejection-shake animation, as data.
//!
//! When a close attempt is vetoed the dialog stays open and the host plays a
//! fixed horizontal shake on the dialog's root element. The manager is
//! headless, so the shake ships as keyframes the presentation layer can
//! sample; no clock is read here.

use std::time::Duration;

/// Total duration of one shake.
pub const SHAKE_DURATION: Duration = Duration::from_millis(1000);

/// Peak horizontal displacement in layout units (columns or pixels).
pub const SHAKE_AMPLITUDE: i16 = 10;

/// (progress, horizontal offset) keyframes; progress runs 0.0 to 1.0 and the
/// shake starts and ends at rest.
const KEYFRAMES: [(f32, i16); 11] = [
    (0.0, 0),
    (0.1, -SHAKE_AMPLITUDE),
    (0.2, SHAKE_AMPLITUDE),
    (0.3, -SHAKE_AMPLITUDE),
    (0.4, SHAKE_AMPLITUDE),
    (0.5, -SHAKE_AMPLITUDE),
    (0.6, SHAKE_AMPLITUDE),
    (0.7, -SHAKE_AMPLITUDE),
    (0.8, SHAKE_AMPLITUDE),
    (0.9, -SHAKE_AMPLITUDE),
    (1.0, 0),
];

/// The raw keyframes, for hosts that hand the whole track to an animation
/// engine.
#[must_use]
pub fn keyframes() -> &'static [(f32, i16)] {
    &KEYFRAMES
}

/// The horizontal offset at `progress`, linearly interpolated between
/// keyframes. `progress` is clamped to `[0.0, 1.0]`.
#[must_use]
pub fn offset_at(progress: f32) -> i16 {
    let progress = progress.clamp(0.0, 1.0);
    let mut prev = KEYFRAMES[0];
    for frame in &KEYFRAMES[1..] {
        if progress <= frame.0 {
            let span = frame.0 - prev.0;
            if span <= f32::EPSILON {
                return frame.1;
            }
            let t = (progress - prev.0) / span;
            let value = f32::from(prev.1) + (f32::from(frame.1) - f32::from(prev.1)) * t;
            return value.round() as i16;
        }
        prev = *frame;
    }
    KEYFRAMES[KEYFRAMES.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_at_both_ends() {
        assert_eq!(offset_at(0.0), 0);
        assert_eq!(offset_at(1.0), 0);
    }

    #[test]
    fn peaks_hit_amplitude() {
        assert_eq!(offset_at(0.1), -SHAKE_AMPLITUDE);
        assert_eq!(offset_at(0.2), SHAKE_AMPLITUDE);
        assert_eq!(offset_at(0.9), -SHAKE_AMPLITUDE);
    }

    #[test]
    fn interpolates_between_keyframes() {
        // Halfway between -10 and 10.
        assert_eq!(offset_at(0.15), 0);
    }

    #[test]
    fn out_of_range_progress_clamps() {
        assert_eq!(offset_at(-1.0), 0);
        assert_eq!(offset_at(2.0), 0);
    }

    #[test]
    fn offsets_never_exceed_amplitude() {
        for i in 0..=100 {
            let offset = offset_at(i as f32 / 100.0);
            assert!(offset.abs() <= SHAKE_AMPLITUDE);
        }
    }
}
