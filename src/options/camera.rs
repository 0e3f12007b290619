use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Projection, manual control, and choreography parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Drag rotation sensitivity.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Drag pan sensitivity.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Scroll zoom sensitivity.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Fly-to duration in milliseconds.
    #[schemars(title = "Fly Duration (ms)", range(min = 100.0, max = 5000.0), extend("step" = 50.0))]
    pub fly_duration_ms: f32,
    /// Distance kept from a fly-to target.
    #[schemars(title = "Fly Standoff", range(min = 5.0, max = 200.0), extend("step" = 1.0))]
    pub fly_standoff: f32,
    /// Orbit speed in radians per second.
    #[schemars(title = "Orbit Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub orbit_speed: f32,
    /// Auto-drift speed in radians per second.
    #[schemars(title = "Drift Speed", range(min = 0.0, max = 0.2), extend("step" = 0.005))]
    pub drift_speed: f32,
    /// Seconds without input before auto-drift starts.
    #[schemars(title = "Drift Delay (s)", range(min = 1.0, max = 120.0), extend("step" = 1.0))]
    pub drift_delay_secs: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 50.0,
            znear: 0.5,
            zfar: 4000.0,
            rotate_speed: 0.5,
            pan_speed: 0.5,
            zoom_speed: 0.1,
            fly_duration_ms: 1200.0,
            fly_standoff: 40.0,
            orbit_speed: 0.25,
            drift_speed: 0.03,
            drift_delay_secs: 20.0,
        }
    }
}
