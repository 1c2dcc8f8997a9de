//! Abstract per-frame input. Device capture lives outside the simulation.

use std::f32::consts::PI;

/// Controls sampled once per frame by the outer shell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Horizontal intent in `[-1, 1]`.
    pub move_axis: f32,
    /// Aim angle in radians (0 = right, canvas y down).
    pub aim_angle: f32,
    pub jump: bool,
    pub fire: bool,
    pub jetpack: bool,
}

impl InputSnapshot {
    /// Copy with the axis clamped and non-finite values zeroed.
    pub fn sanitized(&self) -> Self {
        let move_axis = if self.move_axis.is_finite() {
            self.move_axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let aim_angle = if self.aim_angle.is_finite() {
            (self.aim_angle + PI).rem_euclid(2.0 * PI) - PI
        } else {
            0.0
        };
        Self {
            move_axis,
            aim_angle,
            ..*self
        }
    }

    pub fn moving(&self) -> bool {
        self.move_axis.abs() > 0.05
    }
}
