//! Easing curves and timed transitions.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    #[default]
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Arbitrary CSS-style cubic bezier with control points `(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map linear progress `t` (clamped to 0-1) through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Easing::Linear => t,
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                cubic_bezier(x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2, t)
            }
        }
    }
}

fn bezier(a1: f32, a2: f32, s: f32) -> f32 {
    // B(s) for P0 = 0, P3 = 1.
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
}

fn bezier_slope(a1: f32, a2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
}

/// Solve x(s) = t for s, then return y(s).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut s = t;
    for _ in 0..8 {
        let x = bezier(x1, x2, s) - t;
        if x.abs() < 1e-6 {
            return bezier(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= x / slope;
    }

    // Newton did not converge; x(s) is monotonic on [0,1], so bisect.
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = bezier(x1, x2, s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier(y1, y2, s)
}

/// A one-shot transition started at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// When the transition was triggered, in seconds.
    pub start: f32,
    /// Wait before progress begins, in seconds.
    pub delay: f32,
    /// Length of the eased part, in seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Transition {
    pub fn new(start: f32, delay: f32, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            delay: delay.max(0.0),
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Eased progress at `now`, 0-1.
    pub fn progress(&self, now: f32) -> f32 {
        let local = now - self.start - self.delay;
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.apply(local / self.duration)
    }

    /// Whether the transition has fully played at `now`.
    pub fn is_finished(&self, now: f32) -> bool {
        now >= self.start + self.delay + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(Easing::EaseOut.apply(t) > t, "ease-out at {t}");
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.apply(0.25);
        let b = Easing::EaseInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-4);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_ease_out_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = Easing::EaseOut.apply(i as f32 / 100.0);
            assert!(v >= last - 1e-6);
            last = v;
        }
    }

    #[test]
    fn test_transition_delay_and_duration() {
        let tr = Transition::new(1.0, 0.2, 0.5, Easing::Linear);
        assert_eq!(tr.progress(1.0), 0.0);
        assert_eq!(tr.progress(1.19), 0.0);
        assert!((tr.progress(1.45) - 0.5).abs() < 1e-5);
        assert_eq!(tr.progress(2.0), 1.0);
        assert!(!tr.is_finished(1.6));
        assert!(tr.is_finished(1.75));
    }

    #[test]
    fn test_zero_duration_snaps() {
        let tr = Transition::new(0.0, 0.0, 0.0, Easing::EaseOut);
        assert_eq!(tr.progress(0.0), 0.0);
        assert_eq!(tr.progress(0.001), 1.0);
    }
}
