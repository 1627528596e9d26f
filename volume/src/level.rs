//! Conversion between platform volume steps and normalized levels.
//!
//! Platforms expose volume as an integer step in `0..=max`, where `max`
//! depends on the stream and the device. Callers only ever see a normalized
//! level in `[0.0, 1.0]`, rounded with [`round2`].

/// A normalized volume level in `[0.0, 1.0]`.
pub type VolumeLevel = f64;

/// Number of decimal digits kept by [`round2`].
pub const REPORTED_DECIMALS: i32 = 1;

/// Round a level the way it is reported to callers.
///
/// Rounds to [`REPORTED_DECIMALS`] digits, resolving exact ties toward zero
/// (half-down). The tie test uses the exact binary value of `value`, so `0.25`
/// is a tie and goes down while `0.65`, stored slightly above the midpoint,
/// goes up:
///
/// ```
/// use resonance_volume::round2;
///
/// assert_eq!(round2(0.25), 0.2);
/// assert_eq!(round2(0.65), 0.7);
/// assert_eq!(round2(0.15), 0.1);
/// ```
///
/// One decimal is coarser than most devices' step count, so neighbouring
/// steps can report the same level: on a 15-step stream, steps 1 and 2 both
/// report `0.1`, and setting `0.1` lands on step 2.
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_half_down(value, REPORTED_DECIMALS)
}

/// Round `value` to `places` decimal digits, ties toward zero.
#[must_use]
pub fn round_half_down(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if value < 0.0 {
        return -round_half_down(-value, places);
    }

    let factor = 10f64.powi(places);
    let lower = (value * factor).floor();
    // `mul_add` rounds once, so the sign of `value * factor - (lower + 0.5)`
    // is exact even when the product itself is not representable.
    let above_midpoint = value.mul_add(factor, -(lower + 0.5)) > 0.0;
    let rounded = if above_midpoint { lower + 1.0 } else { lower };
    rounded / factor
}

/// Convert a platform step into a reported level.
///
/// A `max_step` of zero reports `0.0`.
#[must_use]
pub fn normalize(step: u32, max_step: u32) -> VolumeLevel {
    if max_step == 0 {
        return 0.0;
    }
    round2(f64::from(step) / f64::from(max_step))
}

/// Convert a requested level into a platform step.
///
/// The level is clamped into `[0.0, 1.0]` (NaN counts as `0.0`) and the
/// product is rounded to the nearest step, half-up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn denormalize(level: VolumeLevel, max_step: u32) -> u32 {
    let level = if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    };
    let step = (level * f64::from(max_step)).round();
    // Clamped above, so the cast stays within 0..=max_step.
    (step as u32).min(max_step)
}
