//! Easing curves for the camera sequencer.
//!
//! All curves map `t` in `[0, 1]` to `[0, 1]`. Inputs outside the range are
//! clamped so a late final tick cannot overshoot the destination pose.

/// Function type shared by every curve, so the sequencer can be handed a
/// different feel without changing its timing logic.
pub type EasingFn = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out: slow start, fast middle, slow settle.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Cubic ease-out: fast start, long settle. Used by the entry flourish.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for ease in [linear as EasingFn, ease_in_out_cubic, ease_out_cubic] {
            assert_eq!(ease(0.0), 0.0);
            assert_eq!(ease(1.0), 1.0);
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(ease_in_out_cubic(-0.5), 0.0);
        assert_eq!(ease_in_out_cubic(1.5), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn in_out_cubic_is_symmetric_about_midpoint() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        for i in 1..10 {
            let t = i as f32 / 10.0;
            let a = ease_in_out_cubic(t);
            let b = 1.0 - ease_in_out_cubic(1.0 - t);
            assert!((a - b).abs() < 1e-5, "asymmetric at t={t}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for ease in [ease_in_out_cubic as EasingFn, ease_out_cubic] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease(i as f32 / 100.0);
                assert!(v >= prev - 1e-6);
                prev = v;
            }
        }
    }
}
