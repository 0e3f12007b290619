//! Orbital camera with fly-to, orbit, and idle auto-drift.
//!
//! The camera looks at a focus point from `distance` along the
//! orientation's +Z. Manual rotate/pan/zoom act immediately; choreography
//! (fly-to, orbit, drift) advances in [`CameraController::tick`] from
//! wall-clock time, so it runs at the same speed at any frame rate.

use glam::{Quat, Vec2, Vec3};
use web_time::{Duration, Instant};

use super::core::Camera;
use crate::layout::placement::{centroid, outer_radius};
use crate::options::{millis, CameraOptions};
use crate::util::easing::EasingFunction;

/// Pixel deltas are scaled by this before the speed options apply.
const RADIANS_PER_PIXEL: f32 = 0.01;
const MIN_DISTANCE: f32 = 1.0;
/// Padding applied when framing a bounding sphere.
const FIT_PADDING: f32 = 1.5;

/// What the camera is doing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMotion {
    /// Nothing; waiting for input or the drift delay.
    #[default]
    Idle,
    /// Easing toward a fly-to target.
    Flying,
    /// Turning around the focus at orbit speed.
    Orbiting,
    /// Turning slowly after a period without input.
    Drifting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from_focus: Vec3,
    to_focus: Vec3,
    from_distance: f32,
    to_distance: f32,
    start: Instant,
    duration: Duration,
}

/// Camera state machine.
#[derive(Debug, Clone)]
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus: Vec3,
    camera: Camera,
    options: CameraOptions,
    viewport: (u32, u32),
    flight: Option<Flight>,
    orbiting: bool,
    last_input: Instant,
    last_tick: Option<Instant>,
}

impl CameraController {
    /// Camera at the origin looking down -Z from 150 units.
    pub fn new(options: &CameraOptions, viewport: (u32, u32), now: Instant) -> Self {
        let mut controller = Self {
            orientation: Quat::IDENTITY,
            distance: 150.0,
            focus: Vec3::ZERO,
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, 150.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect: aspect(viewport),
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
            options: options.clone(),
            viewport,
            flight: None,
            orbiting: false,
            last_input: now,
            last_tick: None,
        };
        controller.update_camera();
        controller
    }

    /// The current camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Viewport size in physical pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Point the camera looks at.
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Distance from eye to focus.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current autonomous motion.
    pub fn motion(&self, now: Instant) -> CameraMotion {
        if self.flight.is_some() {
            CameraMotion::Flying
        } else if self.orbiting {
            CameraMotion::Orbiting
        } else if self.should_drift(now) {
            CameraMotion::Drifting
        } else {
            CameraMotion::Idle
        }
    }

    /// Whether orbit is on.
    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    /// Apply new options. Projection values take effect at once.
    pub fn set_options(&mut self, options: &CameraOptions) {
        self.options = options.clone();
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.aspect = aspect(self.viewport);
    }

    /// Record user input: resets the drift timer and cancels a flight.
    pub fn note_input(&mut self, now: Instant) {
        self.last_input = now;
        self.flight = None;
    }

    /// Rotate by a drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let k = self.options.rotate_speed * RADIANS_PER_PIXEL;
        let up = self.orientation * Vec3::Y;
        self.orientation = Quat::from_axis_angle(up, -delta.x * k) * self.orientation;
        let right = self.orientation * Vec3::X;
        self.orientation = Quat::from_axis_angle(right, -delta.y * k) * self.orientation;
        self.orientation = self.orientation.normalize();
        self.update_camera();
    }

    /// Pan by a drag delta in pixels, scaled with distance.
    pub fn pan(&mut self, delta: Vec2) {
        let k = self.options.pan_speed * RADIANS_PER_PIXEL * self.distance * 0.2;
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        self.focus += right * (-delta.x * k) + up * (delta.y * k);
        self.update_camera();
    }

    /// Zoom (positive = in).
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.options.zoom_speed;
        self.distance = self.distance.clamp(MIN_DISTANCE, self.max_distance());
        self.update_camera();
    }

    /// Frame `positions` at once: focus on their centroid at a distance
    /// that fits their bounding sphere. Empty input is ignored.
    pub fn fit_to_positions(&mut self, positions: &[Vec3]) {
        let Some((center, distance)) = self.framing(positions) else {
            return;
        };
        self.flight = None;
        self.focus = center;
        self.distance = distance;
        self.update_camera();
    }

    /// Fly to frame `positions`. Empty input is ignored.
    pub fn fly_to_fit(&mut self, positions: &[Vec3], now: Instant) {
        if let Some((center, distance)) = self.framing(positions) {
            self.fly(center, distance, now);
        }
    }

    /// Fly to look at `target` from the standoff distance.
    pub fn fly_to(&mut self, target: Vec3, now: Instant) {
        self.fly(target, self.options.fly_standoff, now);
    }

    fn fly(&mut self, focus: Vec3, distance: f32, now: Instant) {
        self.last_input = now;
        self.flight = Some(Flight {
            from_focus: self.focus,
            to_focus: focus,
            from_distance: self.distance,
            to_distance: distance.clamp(MIN_DISTANCE, self.max_distance()),
            start: now,
            duration: millis(self.options.fly_duration_ms),
        });
    }

    /// Start orbiting the focus.
    pub fn start_orbit(&mut self) {
        self.orbiting = true;
    }

    /// Stop orbiting.
    pub fn stop_orbit(&mut self) {
        self.orbiting = false;
    }

    /// Toggle orbit. Returns whether orbit is now on.
    pub fn toggle_orbit(&mut self) -> bool {
        self.orbiting = !self.orbiting;
        self.orbiting
    }

    /// Advance flight, orbit, and drift to `now`. Returns whether the
    /// camera moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let dt = self
            .last_tick
            .map_or(0.0, |t| now.saturating_duration_since(t).as_secs_f32());
        self.last_tick = Some(now);
        let mut moved = false;

        if let Some(flight) = self.flight {
            let t = if flight.duration.is_zero() {
                1.0
            } else {
                (now.saturating_duration_since(flight.start).as_secs_f32()
                    / flight.duration.as_secs_f32())
                .min(1.0)
            };
            let eased = EasingFunction::CubicOut.evaluate(t);
            self.focus = flight.from_focus.lerp(flight.to_focus, eased);
            self.distance =
                flight.from_distance + (flight.to_distance - flight.from_distance) * eased;
            if t >= 1.0 {
                self.flight = None;
            }
            moved = true;
        }

        let spin = if self.orbiting {
            self.options.orbit_speed
        } else if self.flight.is_none() && self.should_drift(now) {
            self.options.drift_speed
        } else {
            0.0
        };
        if spin != 0.0 && dt > 0.0 {
            let up = self.orientation * Vec3::Y;
            self.orientation =
                (Quat::from_axis_angle(up, spin * dt) * self.orientation).normalize();
            moved = true;
        }

        if moved {
            self.update_camera();
        }
        moved
    }

    fn should_drift(&self, now: Instant) -> bool {
        self.options.drift_speed > 0.0
            && now.saturating_duration_since(self.last_input).as_secs_f32()
                >= self.options.drift_delay_secs
    }

    fn framing(&self, positions: &[Vec3]) -> Option<(Vec3, f32)> {
        let center = centroid(positions.iter().copied())?;
        let radius = outer_radius(positions, center);
        let half_fov = (self.camera.fovy.to_radians() * 0.5).max(0.01);
        Some((center, radius / half_fov.tan() * FIT_PADDING))
    }

    fn max_distance(&self) -> f32 {
        (self.options.zfar * 0.5).max(MIN_DISTANCE)
    }

    fn update_camera(&mut self) {
        let dir = self.orientation * Vec3::Z;
        self.camera.eye = self.focus + dir * self.distance;
        self.camera.target = self.focus;
        self.camera.up = self.orientation * Vec3::Y;
    }
}

fn aspect((w, h): (u32, u32)) -> f32 {
    if h == 0 {
        1.0
    } else {
        w as f32 / h as f32
    }
}
