use spindle_engine::coords::ColorRgba;

use crate::motion::Motion;

/// What to do with an actor whose program failed to compile or link.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FailurePolicy {
    /// Keep the actor, but never issue its draw call.
    #[default]
    SkipActor,
    /// Log and keep drawing with whatever handle the backend returned.
    Continue,
}

/// Line field configuration.
///
/// Defaults reproduce the reference animation: 1000 actors whose fixed ends
/// sit on the unit circle and whose moving ends sweep a circle of 1.5.
#[derive(Debug, Clone, PartialEq)]
pub struct LinesConfig {
    /// Number of actors, fixed for the life of the registry.
    pub count: usize,
    /// Radius of the circle holding every actor's `start`.
    pub start_radius: f64,
    /// Radius of the circle traced by every actor's `end`.
    pub end_radius: f64,
    /// Milliseconds-to-speed factor (`k1`).
    pub speed_scale: f64,
    /// Speed-to-phase factor (`k2`).
    pub phase_rate: f64,
    pub background: ColorRgba,
    pub point_size: f32,
    pub failure_policy: FailurePolicy,
    /// Seed for actor colors; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            start_radius: 1.0,
            end_radius: 1.5,
            speed_scale: 0.01,
            phase_rate: 0.1,
            background: ColorRgba::new(0.2, 0.3, 0.3, 1.0),
            point_size: 2.0,
            failure_policy: FailurePolicy::default(),
            seed: None,
        }
    }
}

impl LinesConfig {
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Uses one radius for both the fixed and the moving end.
    pub fn radius(mut self, radius: f64) -> Self {
        self.start_radius = radius;
        self.end_radius = radius;
        self
    }

    pub fn start_radius(mut self, radius: f64) -> Self {
        self.start_radius = radius;
        self
    }

    pub fn end_radius(mut self, radius: f64) -> Self {
        self.end_radius = radius;
        self
    }

    /// Sets `k1` and `k2`: each frame advances phase by `delta_ms · k1 · k2`.
    pub fn speed(mut self, speed_scale: f64, phase_rate: f64) -> Self {
        self.speed_scale = speed_scale;
        self.phase_rate = phase_rate;
        self
    }

    pub fn background(mut self, color: ColorRgba) -> Self {
        self.background = color;
        self
    }

    pub fn point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn motion(&self) -> Motion {
        Motion {
            speed_scale: self.speed_scale,
            phase_rate: self.phase_rate,
            end_radius: self.end_radius,
        }
    }
}
