//! Easing functions for layout transitions and camera flights.
//!
//! All curves map `t ∈ [0, 1]` onto `[0, 1]` with `f(0) = 0` and
//! `f(1) = 1`; inputs outside the unit interval are clamped.

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-out: `1 - (1 - t)³`.
    CubicOut,
    /// Cubic ease-in-out (slow start and end).
    CubicInOut,
}

impl EasingFunction {
    /// Default easing for layout transitions and fly-to.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for f in [
            EasingFunction::Linear,
            EasingFunction::QuadraticOut,
            EasingFunction::CubicOut,
            EasingFunction::CubicInOut,
        ] {
            assert_eq!(f.evaluate(0.0), 0.0);
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cubic_out_values() {
        let f = EasingFunction::CubicOut;
        // 1 - 0.5³
        assert!((f.evaluate(0.5) - 0.875).abs() < 1e-6);
        assert!(f.evaluate(0.25) > 0.25);
    }

    #[test]
    fn test_input_clamping() {
        let f = EasingFunction::CubicOut;
        assert_eq!(f.evaluate(-0.5), 0.0);
        assert!((f.evaluate(1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_in_out_symmetry() {
        let f = EasingFunction::CubicInOut;
        assert!((f.evaluate(0.5) - 0.5).abs() < 1e-6);
        let a = f.evaluate(0.2);
        let b = f.evaluate(0.8);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_default_is_cubic_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicOut);
    }
}
