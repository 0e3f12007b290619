//! Aurora: bands of color sweep through the graph.
//!
//! A fixed bank of plane waves travels across the graph's bounding sphere.
//! Each wave has a direction, speed, width and hue. An instance's
//! distance to each wave front, along that wave's axis, gives a
//! raised-cosine weight; its color is the baseline blended toward the
//! weighted hues, and its scale and opacity follow the summed weight.

use std::f32::consts::PI;

use glam::Vec3;
use web_time::Instant;

use super::{scale_color, AmbientSnapshot};
use crate::graph::palette::hsv_to_rgb;
use crate::layout::placement::fibonacci_sphere;
use crate::options::AmbientOptions;
use crate::renderer::{InstanceAttributes, NodeRenderer, RenderAdapter, RenderBackend};
use crate::util::hash::unit_from_index;

/// Wave fronts travel over `[-REACH, REACH]` in radius units so they
/// enter and leave fully outside the graph.
const REACH: f32 = 1.3;

/// One traveling plane wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    /// Unit travel direction.
    pub direction: Vec3,
    /// Fronts per second, in units of the sweep length.
    pub speed: f32,
    /// Half-width in radius units.
    pub width: f32,
    /// Wave color.
    pub hue: [f32; 3],
    /// Starting point of the front in `[0, 1)` of the sweep.
    pub offset: f32,
}

impl Wave {
    /// Raised-cosine weight in `[0, 1]` at axis coordinate `s` (radius
    /// units) and time `t` seconds.
    pub fn weight(&self, s: f32, t: f32) -> f32 {
        let front = -REACH + 2.0 * REACH * (self.offset + self.speed * t).fract();
        let d = (s - front).abs();
        if d >= self.width {
            return 0.0;
        }
        0.5 * (1.0 + (PI * d / self.width).cos())
    }
}

/// The deterministic wave bank for `opts`.
pub fn wave_bank(opts: &AmbientOptions) -> Vec<Wave> {
    let n = opts.aurora_waves.max(1);
    (0..n)
        .map(|k| {
            let jitter = unit_from_index(k, 0xa0_7a);
            Wave {
                direction: fibonacci_sphere(k, n.max(2)),
                speed: opts.aurora_speed * (0.75 + 0.5 * jitter),
                width: opts.aurora_width,
                hue: hsv_to_rgb(0.33 + 0.45 * k as f32 / n as f32, 0.7, 1.0),
                offset: unit_from_index(k, 0x0ff5),
            }
        })
        .collect()
}

/// Blend of `base` toward the wave hues at a point, and the summed
/// intensity clamped to 1.
pub fn shade(
    waves: &[Wave],
    local: Vec3,
    t: f32,
    base: [f32; 3],
) -> ([f32; 3], f32) {
    let mut tint = [0.0_f32; 3];
    let mut total = 0.0_f32;
    for wave in waves {
        let w = wave.weight(local.dot(wave.direction), t);
        total += w;
        for (acc, h) in tint.iter_mut().zip(wave.hue) {
            *acc += w * h;
        }
    }
    if total <= 0.0 {
        return (base, 0.0);
    }
    let intensity = total.min(1.0);
    let mut out = base;
    for ((o, b), acc) in out.iter_mut().zip(base).zip(tint) {
        *o = b * (1.0 - intensity) + (acc / total) * intensity;
    }
    (out, intensity)
}

/// The running Aurora overlay.
#[derive(Debug, Clone)]
pub struct Aurora {
    snapshot: AmbientSnapshot,
    waves: Vec<Wave>,
    started: Instant,
}

impl Aurora {
    /// Snapshot the adapter, build the wave bank, relax bloom.
    pub fn start<B: RenderBackend>(
        adapter: &RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) -> Self {
        let snapshot = AmbientSnapshot::capture(adapter, backend);
        backend.set_bloom_strength(snapshot.bloom() * opts.bloom_relax);
        let waves = wave_bank(opts);
        log::info!("aurora started with {} waves", waves.len());
        Self {
            snapshot,
            waves,
            started: now,
        }
    }

    /// The activation snapshot.
    pub fn snapshot(&self) -> &AmbientSnapshot {
        &self.snapshot
    }

    /// The wave bank.
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Write the frame for `now` and commit.
    pub fn tick<B: RenderBackend>(
        &self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        now: Instant,
    ) {
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        let frame = Frame {
            waves: &self.waves,
            center: self.snapshot.center(),
            radius: self.snapshot.radius(),
            t,
        };
        frame.paint(adapter.blocks_mut(), &self.snapshot.blocks);
        frame.paint(adapter.channels_mut(), &self.snapshot.channels);
        adapter.commit_attributes(backend);
    }

    /// Restore the snapshot and bloom.
    pub fn stop<B: RenderBackend>(self, adapter: &mut RenderAdapter, backend: &mut B) {
        self.snapshot.restore(adapter, backend);
        log::info!("aurora stopped");
    }
}

struct Frame<'a> {
    waves: &'a [Wave],
    center: Vec3,
    radius: f32,
    t: f32,
}

impl Frame<'_> {
    fn paint(&self, renderer: &mut NodeRenderer, base: &InstanceAttributes) {
        let live = renderer.attributes_mut();
        for i in 0..base.len() {
            let (Some(p), Some(c), Some(o), Some(s)) = (
                base.position(i),
                base.color(i),
                base.opacity(i),
                base.scale(i),
            ) else {
                continue;
            };
            let local = (p - self.center) / self.radius;
            let (color, intensity) = shade(self.waves, local, self.t, c);
            live.set_color(i, scale_color(color, 1.0 + 0.3 * intensity));
            live.set_scale(i, s * (1.0 + 0.5 * intensity));
            live.set_opacity(i, (o * (0.45 + 0.55 * intensity)).clamp(0.0, 1.0));
        }
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
    fn bank_is_deterministic() {
        let opts = AmbientOptions::default();
        assert_eq!(wave_bank(&opts), wave_bank(&opts));
        assert_eq!(wave_bank(&opts).len(), opts.aurora_waves);
        for w in wave_bank(&opts) {
            assert!((w.direction.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn raised_cosine_falloff() {
        let wave = Wave {
            direction: Vec3::X,
            speed: 0.0,
            width: 0.2,
            hue: [0.0, 1.0, 0.0],
            offset: 0.5,
        };
        // Front sits at the origin.
        assert!((wave.weight(0.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((wave.weight(0.1, 0.0) - 0.5).abs() < 1e-5);
        assert_eq!(wave.weight(0.2, 0.0), 0.0);
        assert_eq!(wave.weight(-0.9, 0.0), 0.0);
    }

    #[test]
    fn shade_outside_every_wave_is_baseline() {
        let wave = Wave {
            direction: Vec3::X,
            speed: 0.0,
            width: 0.1,
            hue: [0.0, 1.0, 0.0],
            offset: 0.5,
        };
        let base = [0.2, 0.3, 0.4];
        assert_eq!(shade(&[wave], Vec3::new(0.8, 0.0, 0.0), 0.0, base), (base, 0.0));
        let (on_front, k) = shade(&[wave], Vec3::ZERO, 0.0, base);
        assert!((k - 1.0).abs() < 1e-6);
        assert_eq!(on_front, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn stop_restores_snapshot_exactly() {
        let graph = fixture();
        let mut backend = HeadlessBackend::new();
        let mut adapter = RenderAdapter::new(&mut backend, &graph, Duration::ZERO);
        adapter.stage_layout(&LayoutKind::Galaxy.compute(&graph));
        adapter.commit_positions(&mut backend);
        let before = adapter.clone();
        let opts = AmbientOptions::default();
        let t0 = Instant::now();

        let aurora = Aurora::start(&adapter, &mut backend, &opts, t0);
        for ms in [0, 400, 1300, 5000] {
            aurora.tick(&mut adapter, &mut backend, t0 + Duration::from_millis(ms));
        }
        assert_eq!(adapter.current_layout(), before.current_layout());
        aurora.stop(&mut adapter, &mut backend);
        assert_eq!(adapter.blocks().attributes(), before.blocks().attributes());
        assert!((backend.bloom_strength() - 1.0).abs() < f32::EPSILON);
    }
}
