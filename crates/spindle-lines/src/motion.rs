use spindle_engine::coords::Vec3;

use crate::registry::LineRegistry;

/// Per-frame phase integration parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Motion {
    /// `k1`: converts elapsed milliseconds into speed.
    pub speed_scale: f64,
    /// `k2`: converts speed into phase.
    pub phase_rate: f64,
    pub end_radius: f64,
}

impl Motion {
    /// Phase increment for a frame that took `delta_ms`.
    ///
    /// Negative or non-finite deltas count as zero, so phase never decreases.
    #[inline]
    pub fn phase_step(&self, delta_ms: f64) -> f64 {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let speed = delta_ms * self.speed_scale;
        self.phase_rate * speed
    }

    /// Where the moving end sits for `phase`.
    #[inline]
    pub fn endpoint(&self, phase: f64) -> Vec3 {
        Vec3::on_circle(self.end_radius, phase)
    }
}

/// Advances every actor's phase by one frame and recomputes its `end`.
///
/// Runs after the draw pass, so what was just drawn is the state from the
/// previous call.
pub fn advance(registry: &mut LineRegistry, motion: &Motion, delta_ms: f64) {
    let step = motion.phase_step(delta_ms);
    if step == 0.0 {
        return;
    }

    for actor in registry.iter_mut() {
        let phase = actor.phase + step;
        actor.set_phase(phase, motion.endpoint(phase));
    }
}
