use std::f32::consts::PI;

/// Largest integration step; larger frame deltas are sub-stepped
const MAX_STEP_SECS: f32 = 1.0 / 120.0;

/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Mass of the spring (default: 1.0)
    pub mass: f32,
    /// Stiffness of the spring
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
}

impl SpringConfig {
    /// Near-critically damped spring used for slide transitions
    pub const DEFAULT: Self = Self {
        mass: 1.0,
        stiffness: 109.66,
        damping: 20.52,
    };

    /// Build a spring from a damping ratio and a reference duration in seconds.
    ///
    /// The duration is the period of the undamped oscillation, so it acts as
    /// the spring's response time; the settle time is decided by the damping
    /// ratio and the initial velocity. A damping ratio of 1.0 is critical.
    pub fn from_damping_ratio(damping_ratio: f32, duration_secs: f32) -> Self {
        let duration = if duration_secs.is_finite() && duration_secs > 0.0 {
            duration_secs
        } else {
            0.6
        };
        let damping_ratio = damping_ratio.max(0.0);
        let omega = 2.0 * PI / duration;
        Self {
            mass: 1.0,
            stiffness: omega * omega,
            damping: 2.0 * damping_ratio * omega,
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State for spring physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct SpringState {
    /// Current position (0.0 = start, 1.0 = target)
    pub position: f32,
    /// Current velocity, in fractions of the total travel per second
    pub velocity: f32,
}

impl SpringState {
    /// Create a new spring state starting at position 0.0
    pub fn new() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
        }
    }

    /// Spring state at rest at the start, already moving with `velocity`
    pub fn with_velocity(velocity: f32) -> Self {
        Self {
            position: 0.0,
            velocity: if velocity.is_finite() { velocity } else { 0.0 },
        }
    }

    /// Step the spring simulation forward by `dt_secs`.
    ///
    /// Large deltas are split into fixed sub-steps so a dropped frame does not
    /// destabilise the integration. Returns the new position (can overshoot 1.0).
    pub fn step(&mut self, dt_secs: f32, config: &SpringConfig) -> f32 {
        let mut remaining = dt_secs.max(0.0);

        while remaining > 1e-6 {
            let dt = remaining.min(MAX_STEP_SECS);
            remaining -= dt;

            // Target is always 1.0 (we're animating from 0 to 1)
            let displacement = self.position - 1.0;
            let spring_force = -config.stiffness * displacement;
            let damping_force = -config.damping * self.velocity;
            let acceleration = (spring_force + damping_force) / config.mass;

            // Semi-implicit Euler
            self.velocity += acceleration * dt;
            self.position += self.velocity * dt;
        }

        self.position
    }

    /// Check if the spring has settled (position near target, velocity near zero)
    pub fn is_settled(&self, threshold: f32) -> bool {
        (self.position - 1.0).abs() < threshold && self.velocity.abs() < threshold
    }

    /// Jump straight to the target and stop
    pub fn settle(&mut self) {
        self.position = 1.0;
        self.velocity = 0.0;
    }
}

impl Default for SpringState {
    fn default() -> Self {
        Self::new()
    }
}
