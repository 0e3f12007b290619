//! Animated moves between layout results.
//!
//! A transition always starts from the positions the render adapter holds
//! right now, not from the previous target, so a transition started
//! mid-flight continues smoothly from wherever the nodes are. Starting a
//! new transition replaces the old one in the same call: the superseded
//! completion callback is dropped without running and its target is never
//! written again.

use std::fmt;

use glam::Vec3;
use web_time::{Duration, Instant};

use crate::layout::LayoutResult;
use crate::renderer::{RenderAdapter, RenderBackend};
use crate::util::easing::EasingFunction;

/// Called once when a transition reaches its target.
pub type OnComplete = Box<dyn FnOnce()>;

/// Result of advancing a transition by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStatus {
    /// Nothing is animating.
    Idle,
    /// Still running; carries raw progress in `[0, 1)`.
    Running(f32),
    /// The target was written this frame.
    Finished,
}

struct Flight {
    from: LayoutResult,
    to: LayoutResult,
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
    on_complete: Option<OnComplete>,
}

impl Flight {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

enum Phase {
    Idle,
    Animating(Flight),
}

/// Drives [`RenderAdapter`] positions toward a layout result.
pub struct LayoutTransition {
    phase: Phase,
    easing: EasingFunction,
}

impl fmt::Debug for LayoutTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("LayoutTransition");
        let _ = match &self.phase {
            Phase::Idle => s.field("phase", &"idle"),
            Phase::Animating(flight) => s
                .field("phase", &"animating")
                .field("duration", &flight.duration)
                .field("has_callback", &flight.on_complete.is_some()),
        };
        s.finish_non_exhaustive()
    }
}

impl Default for LayoutTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTransition {
    /// Idle transition with cubic ease-out.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            easing: EasingFunction::CubicOut,
        }
    }

    /// Curve used by later [`LayoutTransition::animate_to`] calls.
    pub fn set_easing(&mut self, easing: EasingFunction) {
        self.easing = easing;
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// Target of the in-flight transition.
    pub fn target(&self) -> Option<&LayoutResult> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Animating(flight) => Some(&flight.to),
        }
    }

    /// Cancel any flight and write `result` at once.
    pub fn apply_immediate<B: RenderBackend>(
        &mut self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        result: &LayoutResult,
    ) {
        let _ = self.cancel();
        adapter.stage_layout(result);
        adapter.commit_positions(backend);
    }

    /// Start moving from the adapter's current positions to `target`.
    ///
    /// Any in-flight transition is cancelled first; its callback never
    /// runs.
    pub fn animate_to(
        &mut self,
        adapter: &RenderAdapter,
        target: LayoutResult,
        duration: Duration,
        now: Instant,
        on_complete: Option<OnComplete>,
    ) {
        let _ = self.cancel();
        self.phase = Phase::Animating(Flight {
            from: adapter.current_layout(),
            to: target,
            start: now,
            duration,
            easing: self.easing,
            on_complete,
        });
    }

    /// Drop the in-flight transition, leaving positions where they are.
    /// Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Animating(flight) => {
                if flight.on_complete.is_some() {
                    log::debug!("transition superseded, callback dropped");
                }
                true
            }
        }
    }

    /// Write this frame's interpolated positions.
    ///
    /// At or past the end the exact target is written, the transition
    /// goes idle, and the completion callback runs.
    pub fn tick<B: RenderBackend>(
        &mut self,
        adapter: &mut RenderAdapter,
        backend: &mut B,
        now: Instant,
    ) -> TransitionStatus {
        let Phase::Animating(flight) = &self.phase else {
            return TransitionStatus::Idle;
        };
        let t = flight.progress(now);
        if t < 1.0 {
            let eased = flight.easing.evaluate(t);
            let frame = lerp_layout(&flight.from, &flight.to, eased);
            adapter.stage_layout(&frame);
            adapter.commit_positions(backend);
            return TransitionStatus::Running(t);
        }

        let Phase::Animating(flight) =
            std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return TransitionStatus::Idle;
        };
        adapter.stage_layout(&flight.to);
        adapter.commit_positions(backend);
        if let Some(callback) = flight.on_complete {
            callback();
        }
        TransitionStatus::Finished
    }
}

/// Linear interpolation between two positions.
#[inline]
pub fn lerp_vec3(t: f32, start: Vec3, end: Vec3) -> Vec3 {
    start + (end - start) * t
}

/// Interpolate every position. Entries missing from `from` start at
/// their target.
pub fn lerp_layout(from: &LayoutResult, to: &LayoutResult, t: f32) -> LayoutResult {
    let lerp_all = |a: &[Vec3], b: &[Vec3]| -> Vec<Vec3> {
        b.iter()
            .enumerate()
            .map(|(i, &end)| lerp_vec3(t, a.get(i).copied().unwrap_or(end), end))
            .collect()
    };
    LayoutResult {
        channel_positions: lerp_all(&from.channel_positions, &to.channel_positions),
        block_positions: lerp_all(&from.block_positions, &to.block_positions),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::graph::tests::fixture;
    use crate::layout::LayoutKind;
    use crate::renderer::HeadlessBackend;

    fn setup() -> (HeadlessBackend, RenderAdapter, LayoutResult, LayoutResult) {
        let graph = fixture();
        let mut backend = HeadlessBackend::new();
        let mut adapter = RenderAdapter::new(&mut backend, &graph, Duration::ZERO);
        let spiral = LayoutKind::Spiral.compute(&graph);
        let galaxy = LayoutKind::Galaxy.compute(&graph);
        adapter.stage_layout(&spiral);
        adapter.commit_positions(&mut backend);
        (backend, adapter, spiral, galaxy)
    }

    #[test]
    fn reaches_exact_target_and_calls_back_once() {
        let (mut backend, mut adapter, _, galaxy) = setup();
        let mut tr = LayoutTransition::new();
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        let t0 = Instant::now();
        tr.animate_to(
            &adapter,
            galaxy.clone(),
            Duration::from_millis(100),
            t0,
            Some(Box::new(move || sink.set(sink.get() + 1))),
        );

        let mid = tr.tick(&mut adapter, &mut backend, t0 + Duration::from_millis(50));
        assert!(matches!(mid, TransitionStatus::Running(t) if (t - 0.5).abs() < 1e-3));
        assert_eq!(calls.get(), 0);

        let end = tr.tick(&mut adapter, &mut backend, t0 + Duration::from_millis(150));
        assert_eq!(end, TransitionStatus::Finished);
        assert_eq!(adapter.current_layout(), galaxy);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            tr.tick(&mut adapter, &mut backend, t0 + Duration::from_secs(1)),
            TransitionStatus::Idle
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn superseded_transition_never_lands() {
        let (mut backend, mut adapter, spiral, galaxy) = setup();
        let graph = fixture();
        let sphere = LayoutKind::Sphere.compute(&graph);
        let mut tr = LayoutTransition::new();
        let first = Rc::new(Cell::new(false));
        let sink = Rc::clone(&first);
        let t0 = Instant::now();
        let d = Duration::from_millis(100);

        tr.animate_to(&adapter, galaxy, d, t0, Some(Box::new(move || sink.set(true))));
        let _ = tr.tick(&mut adapter, &mut backend, t0 + Duration::from_millis(30));
        let restart = t0 + Duration::from_millis(30);
        let from = adapter.current_layout();
        assert_ne!(from, spiral);
        tr.animate_to(&adapter, sphere.clone(), d, restart, None);

        // Continuity: the first frame of the new flight starts where the
        // old one stopped.
        let _ = tr.tick(&mut adapter, &mut backend, restart);
        assert_eq!(adapter.current_layout(), from);

        let _ = tr.tick(&mut adapter, &mut backend, restart + d);
        assert_eq!(adapter.current_layout(), sphere);
        assert!(!first.get());
    }

    #[test]
    fn immediate_apply_cancels_flight() {
        let (mut backend, mut adapter, spiral, galaxy) = setup();
        let mut tr = LayoutTransition::new();
        let t0 = Instant::now();
        tr.animate_to(&adapter, galaxy, Duration::from_secs(1), t0, None);
        tr.apply_immediate(&mut adapter, &mut backend, &spiral);
        assert!(!tr.is_animating());
        assert_eq!(
            tr.tick(&mut adapter, &mut backend, t0 + Duration::from_secs(2)),
            TransitionStatus::Idle
        );
        assert_eq!(adapter.current_layout(), spiral);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let (mut backend, mut adapter, _, galaxy) = setup();
        let mut tr = LayoutTransition::new();
        let t0 = Instant::now();
        tr.animate_to(&adapter, galaxy.clone(), Duration::ZERO, t0, None);
        assert_eq!(tr.tick(&mut adapter, &mut backend, t0), TransitionStatus::Finished);
        assert_eq!(adapter.current_layout(), galaxy);
    }
}
