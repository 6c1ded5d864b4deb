// DSP utilities - audio hygiene for the real-time callback

/// Flush denormals to zero
///
/// Denormal numbers (very close to 0) can cause serious CPU slowdowns on
/// some processors. Force very small values to zero to avoid the problem.
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping with tanh
///
/// Gently limits the output into [-1, 1] without hard distortion. Near zero
/// the curve is quasi-linear, so quiet clicks pass through uncolored.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

/// One-pole smoother (first-order low-pass)
///
/// Smooths abrupt parameter changes to avoid clicks and pops when the user
/// drags the volume slider.
///
/// y[n] = y[n-1] + alpha * (x[n] - y[n-1])
pub struct OnePoleSmoother {
    current: f32,
    coefficient: f32,
}

impl OnePoleSmoother {
    /// `time_constant_ms` is the time to reach ~63% of a new target
    pub fn new(initial_value: f32, time_constant_ms: f32, sample_rate: f32) -> Self {
        let time_constant_samples = time_constant_ms * 0.001 * sample_rate;
        let coefficient = 1.0 / time_constant_samples;

        Self {
            current: initial_value,
            coefficient: coefficient.min(1.0),
        }
    }

    /// Advance one sample toward `target`
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.current += self.coefficient * (target - self.current);
        self.current = flush_denormals_to_zero(self.current);
        self.current
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormals() {
        assert_eq!(flush_denormals_to_zero(1e-20), 0.0);
        assert_eq!(flush_denormals_to_zero(0.1), 0.1);
        assert_eq!(flush_denormals_to_zero(-0.1), -0.1);
    }

    #[test]
    fn test_soft_clip_bounds() {
        assert!(soft_clip(10.0) <= 1.0);
        assert!(soft_clip(-10.0) >= -1.0);
        // Quasi-linear near zero
        assert!((soft_clip(0.1) - 0.1).abs() < 0.001);
    }

    #[test]
    fn test_smoother_converges() {
        let mut smoother = OnePoleSmoother::new(0.0, 10.0, 48000.0);
        // 100ms of samples is 10 time constants: effectively converged
        for _ in 0..4800 {
            smoother.process(1.0);
        }
        assert!((smoother.get() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_smoother_moves_gradually() {
        let mut smoother = OnePoleSmoother::new(0.0, 10.0, 48000.0);
        let first = smoother.process(1.0);
        assert!(first > 0.0);
        assert!(first < 0.01);
    }
}
