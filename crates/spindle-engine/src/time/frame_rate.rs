/// Frame-rate readout for the host UI.
///
/// Accumulates frame deltas and publishes an average once per `interval_ms`
/// so the displayed number does not flicker every frame.
#[derive(Debug, Clone)]
pub struct FrameRate {
    interval_ms: f64,
    elapsed_ms: f64,
    frames: u32,
    fps: f64,
}

impl FrameRate {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            elapsed_ms: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Records one frame. Returns the new average when a window completes.
    pub fn record(&mut self, dt_ms: f64) -> Option<f64> {
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            return None;
        }

        self.elapsed_ms += dt_ms;
        self.frames += 1;

        if self.elapsed_ms < self.interval_ms {
            return None;
        }

        self.fps = self.frames as f64 * 1000.0 / self.elapsed_ms;
        self.elapsed_ms = 0.0;
        self.frames = 0;
        Some(self.fps)
    }

    /// Last published average (0 until the first window completes).
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(500.0)
    }
}
