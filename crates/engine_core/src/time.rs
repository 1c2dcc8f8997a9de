//! Frame timing for the simulation loop.
//!
//! The host calls the simulation once per rendered frame with a delta expressed
//! in nominal frames (1.0 = one 60 Hz frame). The core never reads a wall clock.

/// Largest delta the simulation integrates in a single call.
pub const MAX_DT_SCALE: f32 = 4.0;

/// Clamp a host-supplied delta into the range the integrators tolerate.
///
/// Non-finite and non-positive values collapse to `0.0` so the frame becomes a no-op.
pub fn sanitize_dt(raw: f32, max_scale: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    raw.min(max_scale.max(0.0))
}

/// Tracks frame counts and the simulated mission clock.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Every `update` call, including skipped ones.
    frame_count: u64,
    /// Frames that actually advanced the simulation.
    ticks: u64,
    /// Simulated time in nominal frames.
    elapsed: f32,
    /// Delta of the last simulated frame.
    delta: f32,
    /// Upper bound applied by [`sanitize_dt`].
    max_scale: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_DT_SCALE)
    }
}

impl FrameClock {
    /// Create a clock with the given delta cap.
    pub fn new(max_scale: f32) -> Self {
        Self {
            frame_count: 0,
            ticks: 0,
            elapsed: 0.0,
            delta: 0.0,
            max_scale,
        }
    }

    /// Count an incoming frame and return its sanitized delta.
    pub fn begin_frame(&mut self, raw_dt: f32) -> f32 {
        self.frame_count += 1;
        sanitize_dt(raw_dt, self.max_scale)
    }

    /// Record a frame that advanced the simulation by `dt`.
    pub fn advance(&mut self, dt: f32) {
        self.ticks += 1;
        self.elapsed += dt;
        self.delta = dt;
    }

    /// Get the total number of `update` calls.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the number of simulated frames.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get simulated time in nominal frames.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Get the delta of the last simulated frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_caps_spikes() {
        assert_eq!(sanitize_dt(30.0, MAX_DT_SCALE), 4.0);
        assert_eq!(sanitize_dt(1.5, MAX_DT_SCALE), 1.5);
    }

    #[test]
    fn sanitize_rejects_degenerate_input() {
        assert_eq!(sanitize_dt(0.0, MAX_DT_SCALE), 0.0);
        assert_eq!(sanitize_dt(-2.0, MAX_DT_SCALE), 0.0);
        assert_eq!(sanitize_dt(f32::NAN, MAX_DT_SCALE), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY, MAX_DT_SCALE), 0.0);
    }

    #[test]
    fn clock_counts_every_frame_but_ticks_only_simulated_ones() {
        let mut clock = FrameClock::default();
        let dt = clock.begin_frame(0.0);
        assert_eq!(dt, 0.0);
        let dt = clock.begin_frame(2.0);
        clock.advance(dt);
        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.ticks(), 1);
        assert_eq!(clock.elapsed(), 2.0);
    }
}
