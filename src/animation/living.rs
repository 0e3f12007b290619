//! Living: every node breathes.
//!
//! Each instance gets a stable phase hashed from its index. Positions
//! drift by a sum of three sines per axis and scale, opacity and color
//! pulse together on one slower sine. Every frame is `base + f(t, phase)`
//! against the activation snapshot.

use glam::Vec3;
use web_time::Instant;

use super::{scale_color, AmbientSnapshot};
use crate::options::AmbientOptions;
use crate::renderer::{InstanceAttributes, NodeRenderer, RenderAdapter, RenderBackend};
use crate::util::hash::phase_for_index;

/// Per-axis phase offsets so the three axes decorrelate.
const AXIS_SHIFT: [f32; 3] = [0.0, 2.1, 4.2];

/// Channels sit in a separate phase space from blocks.
const CHANNEL_INDEX_OFFSET: usize = 1 << 20;

/// Positional offset of an instance with `phase` at `t` seconds.
pub fn jitter(phase: f32, t: f32, opts: &AmbientOptions) -> Vec3 {
    let axis = |shift: f32| -> f32 {
        opts.living_frequencies
            .iter()
            .enumerate()
            .map(|(k, &f)| (f * t + phase * (k + 1) as f32 + shift).sin())
            .sum::<f32>()
            / opts.living_frequencies.len().max(1) as f32
    };
    Vec3::new(axis(AXIS_SHIFT[0]), axis(AXIS_SHIFT[1]), axis(AXIS_SHIFT[2]))
        * opts.living_amplitude
}

/// Pulse value in `[-1, 1]` of an instance with `phase` at `t` seconds.
pub fn pulse(phase: f32, t: f32, opts: &AmbientOptions) -> f32 {
    (opts.pulse_frequency * t + phase).sin()
}

/// The running Living overlay.
#[derive(Debug, Clone)]
pub struct Living {
    snapshot: AmbientSnapshot,
    started: Instant,
}

impl Living {
    /// Snapshot the adapter, relax bloom, and start the clock.
    pub fn start<B: RenderBackend>(
        adapter: &RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) -> Self {
        let snapshot = AmbientSnapshot::capture(adapter, backend);
        backend.set_bloom_strength(snapshot.bloom() * opts.bloom_relax);
        log::info!("living started");
        Self {
            snapshot,
            started: now,
        }
    }

    /// The activation snapshot.
    pub fn snapshot(&self) -> &AmbientSnapshot {
        &self.snapshot
    }

    /// Write the frame for `now` and commit.
    pub fn tick<B: RenderBackend>(
        &self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) {
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        animate(adapter.blocks_mut(), &self.snapshot.blocks, 0, true, t, opts);
        animate(
            adapter.channels_mut(),
            &self.snapshot.channels,
            CHANNEL_INDEX_OFFSET,
            false,
            t,
            opts,
        );
        adapter.commit_attributes(backend);
        adapter.commit_positions(backend);
    }

    /// Restore the snapshot and bloom.
    pub fn stop<B: RenderBackend>(self, adapter: &mut RenderAdapter, backend: &mut B) {
        self.snapshot.restore(adapter, backend);
        log::info!("living stopped");
    }
}

fn animate(
    renderer: &mut NodeRenderer,
    base: &InstanceAttributes,
    index_offset: usize,
    drift: bool,
    t: f32,
    opts: &AmbientOptions,
) {
    let live = renderer.attributes_mut();
    for i in 0..base.len().min(live.len()) {
        let phase = phase_for_index(i + index_offset);
        let (Some(p), Some(c), Some(o), Some(s)) = (
            base.position(i),
            base.color(i),
            base.opacity(i),
            base.scale(i),
        ) else {
            continue;
        };
        if drift {
            live.set_position(i, p + jitter(phase, t, opts));
        }
        let k = pulse(phase, t, opts) * opts.pulse_depth;
        live.set_scale(i, s * (1.0 + k));
        live.set_opacity(i, (o * (1.0 + 0.5 * k)).clamp(0.0, 1.0));
        live.set_color(i, scale_color(c, 1.0 + 0.5 * k));
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::graph::tests::fixture;
    use crate::layout::LayoutKind;
    use crate::renderer::HeadlessBackend;

    #[test]
    fn jitter_is_bounded_by_amplitude() {
        let opts = AmbientOptions::default();
        for i in 0..50 {
            let j = jitter(phase_for_index(i), i as f32 * 0.37, &opts);
            assert!(j.abs().max_element() <= opts.living_amplitude + 1e-5);
        }
    }

    #[test]
    fn frames_do_not_compound_and_stop_restores() {
        let graph = fixture();
        let mut backend = HeadlessBackend::new();
        let mut adapter = RenderAdapter::new(&mut backend, &graph, Duration::ZERO);
        adapter.stage_layout(&LayoutKind::Sphere.compute(&graph));
        adapter.commit_positions(&mut backend);
        let before = adapter.clone();
        let opts = AmbientOptions::default();
        let t0 = Instant::now();

        let living = Living::start(&adapter, &mut backend, &opts, t0);
        assert!((backend.bloom_strength() - opts.bloom_relax).abs() < 1e-6);

        let at = t0 + Duration::from_millis(700);
        living.tick(&mut adapter, &mut backend, &opts, at);
        let once = adapter.blocks().attributes().clone();
        living.tick(&mut adapter, &mut backend, &opts, t0 + Duration::from_secs(3));
        living.tick(&mut adapter, &mut backend, &opts, at);
        assert_eq!(adapter.blocks().attributes(), &once);
        assert_ne!(adapter.blocks().attributes(), before.blocks().attributes());

        living.stop(&mut adapter, &mut backend);
        assert_eq!(adapter.blocks().attributes(), before.blocks().attributes());
        assert_eq!(adapter.channels().attributes(), before.channels().attributes());
        assert_eq!(adapter.current_layout(), before.current_layout());
        assert!((backend.bloom_strength() - 1.0).abs() < f32::EPSILON);
    }
}
