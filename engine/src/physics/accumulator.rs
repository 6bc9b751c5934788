//! Physics accumulator for fixed timestep physics updates
//!
//! Frame times are fed in as they come; the accumulator hands back how many
//! whole ticks are due and keeps the remainder for interpolation.

use tracing::warn;

/// Accumulator turning variable frame times into fixed physics ticks
#[derive(Debug, Clone)]
pub struct PhysicsAccumulator {
    /// Accumulated time since last physics update
    accumulator: f32,
    /// Fixed timestep for physics updates
    pub fixed_timestep: f32,
    /// Most ticks a single frame may run
    pub max_steps: u32,
}

impl PhysicsAccumulator {
    /// Create a new physics accumulator with the given fixed timestep
    pub fn new(fixed_timestep: f32, max_steps: u32) -> Self {
        Self {
            accumulator: 0.0,
            fixed_timestep,
            max_steps,
        }
    }

    /// Add delta time to the accumulator
    /// Returns the number of physics steps to perform
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time.max(0.0);

        // Prevent spiral of death
        let limit = self.fixed_timestep * self.max_steps as f32;
        if self.accumulator > limit {
            warn!(
                "Physics accumulator too large: {} seconds. Clamping to prevent spiral of death.",
                self.accumulator
            );
            self.accumulator = limit;
        }

        let steps = ((self.accumulator / self.fixed_timestep) as u32).min(self.max_steps);
        self.accumulator = (self.accumulator - steps as f32 * self.fixed_timestep).max(0.0);

        steps
    }

    /// Get the interpolation alpha value for rendering
    /// Alpha is in range [0, 1] representing how far between physics frames we are
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Reset the accumulator to zero
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Get the current accumulated time
    pub fn accumulated_time(&self) -> f32 {
        self.accumulator
    }
}

impl Default for PhysicsAccumulator {
    fn default() -> Self {
        // 50Hz physics updates
        Self::new(0.02, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_basic() {
        let mut acc = PhysicsAccumulator::new(1.0 / 60.0, 8);

        let steps = acc.accumulate(1.0 / 30.0); // 2 frames worth
        assert_eq!(steps, 2);
        assert!(acc.interpolation_alpha().abs() < 0.001);

        let steps = acc.accumulate(1.0 / 120.0); // Half a frame
        assert_eq!(steps, 0);
        assert!((acc.interpolation_alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_accumulator_spiral_of_death() {
        let mut acc = PhysicsAccumulator::new(1.0 / 60.0, 8);

        let steps = acc.accumulate(1.0);
        assert!(steps <= 8);
        assert!(acc.accumulated_time() < acc.fixed_timestep);
    }

    #[test]
    fn test_custom_step_limit() {
        let mut acc = PhysicsAccumulator::new(0.25, 3);
        assert_eq!(acc.accumulate(10.0), 3);
        assert_eq!(acc.accumulated_time(), 0.0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut acc = PhysicsAccumulator::default();
        assert_eq!(acc.accumulate(-1.0), 0);
        assert_eq!(acc.accumulated_time(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut acc = PhysicsAccumulator::new(1.0 / 60.0, 8);
        acc.accumulate(1.0 / 120.0);
        acc.reset();
        assert_eq!(acc.accumulated_time(), 0.0);
    }
}
