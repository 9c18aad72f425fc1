use std::f64::consts::TAU;

use rand::Rng;

use spindle_engine::coords::{ColorRgba, Vec3};
use spindle_engine::render::GraphicsBackend;

use crate::actor::LineActor;
use crate::config::{FailurePolicy, LinesConfig};
use crate::shader;

/// Fixed, ordered collection of actors.
///
/// Insertion order is draw order and update order. Nothing is added or
/// removed after [`initialize`](LineRegistry::initialize); the backend objects
/// are given back through [`release`](LineRegistry::release).
#[derive(Debug, Default)]
pub struct LineRegistry {
    actors: Vec<LineActor>,
}

impl LineRegistry {
    /// Angular slot of actor `index` out of `count`, evenly spread over a turn.
    #[inline]
    pub fn start_angle(index: usize, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        index as f64 / count as f64 * TAU
    }

    /// Creates `config.count` actors with their programs, buffers and arrays.
    ///
    /// Never aborts: an actor whose shaders fail keeps whatever program handle
    /// the backend produced and is disabled or not per `config.failure_policy`.
    pub fn initialize<B, R>(backend: &mut B, config: &LinesConfig, rng: &mut R) -> Self
    where
        B: GraphicsBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let mut actors = Vec::with_capacity(config.count);
        let mut failed = 0usize;

        for index in 0..config.count {
            let angle = Self::start_angle(index, config.count);

            let color = ColorRgba::opaque(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            );

            let build = shader::build_program(backend, color);
            if !build.is_ok() {
                failed += 1;
                log::warn!("line actor {index}: shader setup failed ({} errors)", build.errors.len());
            }

            let enabled = build.is_ok() || config.failure_policy == FailurePolicy::Continue;

            actors.push(LineActor {
                index,
                start: Vec3::on_circle(config.start_radius, angle),
                end: Vec3::zero(),
                phase: angle,
                color,
                program: build.handle,
                vertex_buffer: backend.create_buffer(),
                vertex_array: backend.create_vertex_array(),
                enabled,
            });
        }

        if failed > 0 {
            log::warn!(
                "{failed} of {} line actors failed shader setup (policy {:?})",
                config.count,
                config.failure_policy
            );
        }
        log::info!("initialized {} line actors", actors.len());

        Self { actors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&LineActor> {
        self.actors.get(index)
    }

    /// Actors in draw order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, LineActor> {
        self.actors.iter()
    }

    #[inline]
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, LineActor> {
        self.actors.iter_mut()
    }

    pub fn enabled_count(&self) -> usize {
        self.actors.iter().filter(|a| a.enabled).count()
    }

    /// Deletes every actor's program, buffer and vertex array.
    pub fn release<B>(self, backend: &mut B)
    where
        B: GraphicsBackend + ?Sized,
    {
        let count = self.actors.len();
        for actor in self.actors {
            backend.delete_program(actor.program);
            backend.delete_buffer(actor.vertex_buffer);
            backend.delete_vertex_array(actor.vertex_array);
        }
        log::debug!("released {count} line actors");
    }
}

impl<'a> IntoIterator for &'a LineRegistry {
    type Item = &'a LineActor;
    type IntoIter = std::slice::Iter<'a, LineActor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
