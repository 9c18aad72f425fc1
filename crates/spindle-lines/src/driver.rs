use rand::SeedableRng;
use rand::rngs::StdRng;

use spindle_engine::render::{BufferUsage, GraphicsBackend, Primitive};

use crate::config::LinesConfig;
use crate::motion::{self, Motion};
use crate::registry::LineRegistry;

const POSITION_LOCATION: u32 = 0;
const POSITION_COMPONENTS: u32 = 3;
const VERTICES_PER_LINE: u32 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    Uninitialized,
    Running,
}

/// Frame timing readout for the host.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FrameStats {
    pub delta_ms: f64,
    /// Instantaneous rate, `0.0` for a zero-length frame.
    pub fps: f64,
}

impl FrameStats {
    pub fn from_delta(delta_ms: f64) -> Self {
        let fps = if delta_ms > 0.0 && delta_ms.is_finite() { 1000.0 / delta_ms } else { 0.0 };
        Self { delta_ms, fps }
    }
}

/// What one rendered frame did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    /// Actors whose draw call was issued.
    pub drawn: usize,
    /// Disabled actors passed over.
    pub skipped: usize,
    pub stats: FrameStats,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The driver was not initialized; nothing was issued.
    Skipped,
    Rendered(FrameReport),
}

/// Per-frame orchestration over a [`LineRegistry`].
///
/// `Uninitialized` until [`on_init`](FrameDriver::on_init), `Running` until
/// [`teardown`](FrameDriver::teardown).
pub struct FrameDriver {
    config: LinesConfig,
    motion: Motion,
    registry: Option<LineRegistry>,
    rng: StdRng,
}

impl FrameDriver {
    pub fn new(config: LinesConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            motion: config.motion(),
            config,
            registry: None,
            rng,
        }
    }

    pub fn state(&self) -> DriverState {
        if self.registry.is_some() {
            DriverState::Running
        } else {
            DriverState::Uninitialized
        }
    }

    pub fn registry(&self) -> Option<&LineRegistry> {
        self.registry.as_ref()
    }

    pub fn config(&self) -> &LinesConfig {
        &self.config
    }

    /// Builds the registry on `backend`.
    ///
    /// Calling this while running releases the previous registry first, so a
    /// recreated surface does not leak the old actors' objects.
    pub fn on_init<B>(&mut self, backend: &mut B)
    where
        B: GraphicsBackend + ?Sized,
    {
        if let Some(old) = self.registry.take() {
            log::debug!("re-initializing; releasing {} actors", old.len());
            old.release(backend);
        }
        let registry = LineRegistry::initialize(backend, &self.config, &mut self.rng);
        self.registry = Some(registry);
    }

    /// Clears, draws every enabled actor, then advances all actors by `delta_ms`.
    pub fn on_frame<B>(&mut self, backend: &mut B, delta_ms: f64) -> FrameOutcome
    where
        B: GraphicsBackend + ?Sized,
    {
        let Some(registry) = self.registry.as_mut() else {
            log::trace!("frame before init; skipped");
            return FrameOutcome::Skipped;
        };

        backend.clear(self.config.background);
        backend.set_point_size(self.config.point_size);

        let mut drawn = 0;
        let mut skipped = 0;
        for actor in registry.iter() {
            if !actor.is_enabled() {
                skipped += 1;
                continue;
            }

            backend.bind_vertex_array(Some(actor.vertex_array()));
            backend.bind_buffer(Some(actor.vertex_buffer()));
            backend.upload_vertices(&actor.vertices(), BufferUsage::Dynamic);
            backend.vertex_attrib(POSITION_LOCATION, POSITION_COMPONENTS);
            backend.enable_attrib(POSITION_LOCATION);
            backend.bind_buffer(None);

            backend.use_program(actor.program());
            backend.draw_arrays(Primitive::Lines, 0, VERTICES_PER_LINE);
            drawn += 1;
        }
        backend.bind_vertex_array(None);

        motion::advance(registry, &self.motion, delta_ms);

        FrameOutcome::Rendered(FrameReport {
            drawn,
            skipped,
            stats: FrameStats::from_delta(delta_ms),
        })
    }

    /// The projection is fixed, so a new size changes nothing.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("surface resized to {width}x{height}; projection unchanged");
    }

    /// Releases every actor's backend objects and returns to `Uninitialized`.
    pub fn teardown<B>(&mut self, backend: &mut B)
    where
        B: GraphicsBackend + ?Sized,
    {
        if let Some(registry) = self.registry.take() {
            registry.release(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailurePolicy;
    use crate::testing::{Call, RecordingBackend};

    const EPS: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn running(config: LinesConfig) -> (FrameDriver, RecordingBackend) {
        let mut backend = RecordingBackend::default();
        let mut driver = FrameDriver::new(config.seed(42));
        driver.on_init(&mut backend);
        (driver, backend)
    }

    fn rendered(outcome: FrameOutcome) -> FrameReport {
        match outcome {
            FrameOutcome::Rendered(report) => report,
            FrameOutcome::Skipped => panic!("frame was skipped"),
        }
    }

    #[test]
    fn frame_before_init_is_skipped() {
        let mut backend = RecordingBackend::default();
        let mut driver = FrameDriver::new(LinesConfig::default().count(3));
        assert_eq!(driver.state(), DriverState::Uninitialized);
        assert_eq!(driver.on_frame(&mut backend, 16.0), FrameOutcome::Skipped);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn init_moves_to_running() {
        let (driver, _) = running(LinesConfig::default().count(3));
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.registry().map(LineRegistry::len), Some(3));
    }

    #[test]
    fn zero_delta_draws_each_actor_once_and_keeps_state() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(5));
        let before: Vec<_> = driver.registry().unwrap().iter().cloned().collect();

        let report = rendered(driver.on_frame(&mut backend, 0.0));

        assert_eq!(report.drawn, 5);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.stats.fps, 0.0);
        assert_eq!(backend.draws.len(), 5);
        for (draw, actor) in backend.draws.iter().zip(&before) {
            assert_eq!(draw.primitive, Primitive::Lines);
            assert_eq!((draw.first, draw.count), (0, 2));
            assert_eq!(draw.program, Some(actor.program()));
            assert_eq!(draw.array, Some(actor.vertex_array()));
        }
        let after: Vec<_> = driver.registry().unwrap().iter().cloned().collect();
        assert_eq!(after, before);
    }

    #[test]
    fn frame_starts_with_clear_and_point_size() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(1).point_size(4.0));
        driver.on_frame(&mut backend, 16.0);

        assert_eq!(backend.calls[0], Call::Clear);
        assert_eq!(backend.calls[1], Call::PointSize(4.0));
        assert_eq!(backend.clears, vec![driver.config().background]);
        assert_eq!(backend.point_size, Some(4.0));
    }

    #[test]
    fn per_actor_call_sequence() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(1));
        let actor = driver.registry().unwrap().get(0).unwrap().clone();
        driver.on_frame(&mut backend, 16.0);

        assert_eq!(
            &backend.calls[2..],
            &[
                Call::BindArray(Some(actor.vertex_array())),
                Call::BindBuffer(Some(actor.vertex_buffer())),
                Call::Upload(6, BufferUsage::Dynamic),
                Call::VertexAttrib(0, 3),
                Call::EnableAttrib(0),
                Call::BindBuffer(None),
                Call::UseProgram(actor.program()),
                Call::Draw(Primitive::Lines, 0, 2),
                Call::BindArray(None),
            ]
        );
    }

    #[test]
    fn four_actors_advance_by_a_tenth_per_hundred_ms() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(4).radius(1.0));
        let phases: Vec<f64> = driver.registry().unwrap().iter().map(|a| a.phase()).collect();

        let report = rendered(driver.on_frame(&mut backend, 100.0));
        assert!(close(report.stats.fps, 10.0));

        for (actor, phase) in driver.registry().unwrap().iter().zip(phases) {
            assert!(close(actor.phase(), phase + 0.1));
            let end = actor.end();
            assert!(close(end.x as f64, (phase + 0.1).sin()));
            assert!(close(end.y as f64, (phase + 0.1).cos()));
        }
    }

    #[test]
    fn drawn_geometry_lags_motion_by_one_frame() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(3));
        let before: Vec<[f32; 6]> = driver.registry().unwrap().iter().map(|a| a.vertices()).collect();

        driver.on_frame(&mut backend, 50.0);
        let first: Vec<_> = backend.draws.iter().map(|d| d.vertices.clone()).collect();
        assert_eq!(first, before.iter().map(|v| v.to_vec()).collect::<Vec<_>>());

        let advanced: Vec<[f32; 6]> = driver.registry().unwrap().iter().map(|a| a.vertices()).collect();
        assert_ne!(advanced, before);

        driver.on_frame(&mut backend, 50.0);
        let second: Vec<_> = backend.draws_since(3).iter().map(|d| d.vertices.clone()).collect();
        assert_eq!(second, advanced.iter().map(|v| v.to_vec()).collect::<Vec<_>>());
    }

    #[test]
    fn skip_policy_omits_failed_actor_only() {
        let mut backend = RecordingBackend::default();
        backend.fail_fragments.insert(1);
        let mut driver = FrameDriver::new(LinesConfig::default().count(3).seed(1));
        driver.on_init(&mut backend);

        let report = rendered(driver.on_frame(&mut backend, 16.0));
        assert_eq!((report.drawn, report.skipped), (2, 1));

        let failed = driver.registry().unwrap().get(1).unwrap().program();
        assert!(backend.draws.iter().all(|d| d.program != Some(failed)));
    }

    #[test]
    fn skipped_actor_still_advances() {
        let mut backend = RecordingBackend::default();
        backend.fail_fragments.insert(0);
        let mut driver = FrameDriver::new(LinesConfig::default().count(1).seed(1));
        driver.on_init(&mut backend);
        let phase = driver.registry().unwrap().get(0).unwrap().phase();

        driver.on_frame(&mut backend, 100.0);
        assert!(close(driver.registry().unwrap().get(0).unwrap().phase(), phase + 0.1));
    }

    #[test]
    fn frames_keep_running_after_a_compile_failure() {
        let count = 4;
        let mut backend = RecordingBackend::default();
        backend.fail_fragments.insert(2);
        let mut driver = FrameDriver::new(LinesConfig::default().count(count).seed(3));
        driver.on_init(&mut backend);
        let failed = driver.registry().unwrap().get(2).unwrap().program();

        let mut phases: Vec<f64> = driver.registry().unwrap().iter().map(|a| a.phase()).collect();
        for (frame, delta) in [16.0, 0.0, 33.0, 16.0].into_iter().enumerate() {
            let report = rendered(driver.on_frame(&mut backend, delta));
            assert_eq!((report.drawn, report.skipped), (count - 1, 1));
            assert_eq!(backend.draws.len(), (frame + 1) * (count - 1));

            let now: Vec<f64> = driver.registry().unwrap().iter().map(|a| a.phase()).collect();
            for (i, (after, before)) in now.iter().zip(&phases).enumerate() {
                if i == 2 {
                    continue;
                }
                if delta > 0.0 {
                    assert!(after > before, "actor {i} did not advance in frame {frame}");
                } else {
                    assert_eq!(after, before);
                }
            }
            phases = now;
        }
        assert!(backend.draws.iter().all(|d| d.program != Some(failed)));
    }

    #[test]
    fn continue_policy_draws_with_failed_program() {
        let mut backend = RecordingBackend::default();
        backend.fail_links = true;
        let config = LinesConfig::default()
            .count(2)
            .seed(1)
            .failure_policy(FailurePolicy::Continue);
        let mut driver = FrameDriver::new(config);
        driver.on_init(&mut backend);

        let report = rendered(driver.on_frame(&mut backend, 16.0));
        assert_eq!((report.drawn, report.skipped), (2, 0));
    }

    #[test]
    fn seeded_drivers_pick_the_same_colors() {
        let (a, _) = running(LinesConfig::default().count(8));
        let (b, _) = running(LinesConfig::default().count(8));
        let colors = |d: &FrameDriver| d.registry().unwrap().iter().map(|x| x.color()).collect::<Vec<_>>();
        assert_eq!(colors(&a), colors(&b));
    }

    #[test]
    fn teardown_releases_everything() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(10));
        driver.on_frame(&mut backend, 16.0);
        driver.teardown(&mut backend);

        assert_eq!(driver.state(), DriverState::Uninitialized);
        assert!(backend.programs.is_empty());
        assert!(backend.buffers.is_empty());
        assert!(backend.arrays.is_empty());
        assert!(backend.live_shaders().is_empty());
        assert_eq!(driver.on_frame(&mut backend, 16.0), FrameOutcome::Skipped);
    }

    #[test]
    fn reinit_releases_previous_registry() {
        let (mut driver, mut backend) = running(LinesConfig::default().count(4));
        driver.on_init(&mut backend);
        assert_eq!(backend.programs.len(), 4);
        assert_eq!(backend.buffers.len(), 4);
        assert_eq!(backend.arrays.len(), 4);
    }
}
