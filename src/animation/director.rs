//! Mutual exclusion for the ambient modes.

use web_time::Instant;

use super::aurora::Aurora;
use super::living::Living;
use super::AmbientMode;
use crate::options::AmbientOptions;
use crate::renderer::{RenderAdapter, RenderBackend};

#[derive(Debug, Clone)]
enum Active {
    Living(Living),
    Aurora(Aurora),
}

/// Owns at most one running ambient overlay.
///
/// Switching modes always stops the running overlay first, which restores
/// its snapshot, and only then snapshots again for the new one. The two
/// overlays therefore never write the same arrays in one session state.
#[derive(Debug, Clone, Default)]
pub struct AmbientDirector {
    active: Option<Active>,
}

impl AmbientDirector {
    /// Director with nothing running.
    pub fn new() -> Self {
        Self::default()
    }

    /// The running mode.
    pub fn mode(&self) -> AmbientMode {
        match self.active {
            None => AmbientMode::Off,
            Some(Active::Living(_)) => AmbientMode::Living,
            Some(Active::Aurora(_)) => AmbientMode::Aurora,
        }
    }

    /// Whether any overlay is running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Switch to `mode`. Returns `false` when it was already running.
    pub fn set_mode<B: RenderBackend>(
        &mut self,
        mode: AmbientMode,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) -> bool {
        if mode == self.mode() {
            return false;
        }
        let _ = self.stop(adapter, backend);
        self.active = match mode {
            AmbientMode::Off => None,
            AmbientMode::Living => {
                Some(Active::Living(Living::start(adapter, backend, opts, now)))
            }
            AmbientMode::Aurora => {
                Some(Active::Aurora(Aurora::start(adapter, backend, opts, now)))
            }
        };
        if self.active.is_some() {
            self.tick(adapter, backend, opts, now);
        }
        true
    }

    /// Start `mode`, or stop it when it is the one running. Returns the
    /// resulting mode.
    pub fn toggle<B: RenderBackend>(
        &mut self,
        mode: AmbientMode,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) -> AmbientMode {
        let next = if self.mode() == mode {
            AmbientMode::Off
        } else {
            mode
        };
        let _ = self.set_mode(next, adapter, backend, opts, now);
        self.mode()
    }

    /// Write the running overlay's frame for `now`.
    pub fn tick<B: RenderBackend>(
        &self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        opts: &AmbientOptions,
        now: Instant,
    ) {
        match &self.active {
            None => {}
            Some(Active::Living(living)) => living.tick(adapter, backend, opts, now),
            Some(Active::Aurora(aurora)) => aurora.tick(adapter, backend, now),
        }
    }

    /// Stop and restore whatever is running. Returns whether anything was.
    pub fn stop<B: RenderBackend>(
        &mut self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
    ) -> bool {
        match self.active.take() {
            None => false,
            Some(Active::Living(living)) => {
                living.stop(adapter, backend);
                true
            }
            Some(Active::Aurora(aurora)) => {
                aurora.stop(adapter, backend);
                true
            }
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

    fn setup() -> (HeadlessBackend, RenderAdapter) {
        let graph = fixture();
        let mut backend = HeadlessBackend::new();
        let mut adapter = RenderAdapter::new(&mut backend, &graph, Duration::ZERO);
        adapter.stage_layout(&LayoutKind::Spiral.compute(&graph));
        adapter.commit_positions(&mut backend);
        (backend, adapter)
    }

    #[test]
    fn switching_modes_restores_before_snapshotting() {
        let (mut backend, mut adapter) = setup();
        let before = adapter.clone();
        let opts = AmbientOptions::default();
        let t0 = Instant::now();
        let mut director = AmbientDirector::new();

        assert!(director.set_mode(AmbientMode::Living, &mut adapter, &mut backend, &opts, t0));
        director.tick(&mut adapter, &mut backend, &opts, t0 + Duration::from_millis(800));
        assert!(director.set_mode(AmbientMode::Aurora, &mut adapter, &mut backend, &opts, t0));
        assert_eq!(director.mode(), AmbientMode::Aurora);
        // Bloom was relaxed once from the original value, not twice.
        assert!((backend.bloom_strength() - opts.bloom_relax).abs() < 1e-6);

        assert!(director.stop(&mut adapter, &mut backend));
        assert_eq!(adapter.blocks().attributes(), before.blocks().attributes());
        assert_eq!(adapter.current_layout(), before.current_layout());
        assert!((backend.bloom_strength() - 1.0).abs() < f32::EPSILON);
        assert!(!director.stop(&mut adapter, &mut backend));
    }

    #[test]
    fn toggle_cycles_on_and_off() {
        let (mut backend, mut adapter) = setup();
        let opts = AmbientOptions::default();
        let now = Instant::now();
        let mut director = AmbientDirector::new();
        assert_eq!(
            director.toggle(AmbientMode::Aurora, &mut adapter, &mut backend, &opts, now),
            AmbientMode::Aurora
        );
        assert!(!director.set_mode(AmbientMode::Aurora, &mut adapter, &mut backend, &opts, now));
        assert_eq!(
            director.toggle(AmbientMode::Aurora, &mut adapter, &mut backend, &opts, now),
            AmbientMode::Off
        );
        assert!(!director.is_active());
    }
}
