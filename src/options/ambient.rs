use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ambient", inline)]
#[serde(default)]
/// Living and Aurora parameters.
pub struct AmbientOptions {
    /// Living positional jitter amplitude in world units.
    #[schemars(title = "Drift Amplitude", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub living_amplitude: f32,
    /// Angular frequencies of the three jitter sines (rad/s).
    #[schemars(skip)]
    pub living_frequencies: [f32; 3],
    /// Frequency of the shared scale/opacity/color pulse (rad/s).
    #[schemars(title = "Pulse Rate", range(min = 0.0, max = 6.0), extend("step" = 0.1))]
    pub pulse_frequency: f32,
    /// Relative depth of the pulse.
    #[schemars(title = "Pulse Depth", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub pulse_depth: f32,
    /// Number of aurora waves.
    #[schemars(title = "Aurora Waves", range(min = 1, max = 8))]
    pub aurora_waves: usize,
    /// Wave speed as a fraction of the graph radius per second.
    #[schemars(title = "Aurora Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub aurora_speed: f32,
    /// Wave half-width as a fraction of the graph radius.
    #[schemars(title = "Aurora Width", range(min = 0.05, max = 1.0), extend("step" = 0.01))]
    pub aurora_width: f32,
    /// Bloom multiplier while an ambient mode runs.
    #[schemars(title = "Bloom Relax", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub bloom_relax: f32,
}

impl Default for AmbientOptions {
    fn default() -> Self {
        Self {
            living_amplitude: 0.9,
            living_frequencies: [0.6, 1.1, 1.9],
            pulse_frequency: 1.4,
            pulse_depth: 0.18,
            aurora_waves: 4,
            aurora_speed: 0.12,
            aurora_width: 0.22,
            bloom_relax: 0.6,
        }
    }
}
