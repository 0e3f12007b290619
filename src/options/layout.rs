use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
/// Layout selection and transition timing.
pub struct LayoutOptions {
    /// Layout shown on load.
    #[schemars(title = "Initial Layout")]
    pub initial: LayoutKind,
    /// Layout transition duration in milliseconds.
    #[schemars(title = "Transition (ms)", range(min = 0.0, max = 5000.0), extend("step" = 50.0))]
    pub transition_ms: f32,
    /// Uniform scale applied to every computed layout.
    #[schemars(title = "Spread", range(min = 0.25, max = 4.0), extend("step" = 0.05))]
    pub scale: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            initial: LayoutKind::default(),
            transition_ms: 1600.0,
            scale: 1.0,
        }
    }
}
