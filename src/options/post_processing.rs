use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
/// Values handed to the host's composite chain.
pub struct PostProcessingOptions {
    /// Bloom strength at rest; ambient modes relax it while running.
    #[schemars(title = "Bloom Strength", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub bloom_strength: f32,
    /// Luminance above which pixels bloom.
    #[schemars(title = "Bloom Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bloom_threshold: f32,
    /// Scanline overlay intensity.
    #[schemars(title = "Scanlines", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub scanline_intensity: f32,
    /// Scanline count across the viewport height.
    #[schemars(skip)]
    pub scanline_count: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            bloom_strength: 1.2,
            bloom_threshold: 0.35,
            scanline_intensity: 0.08,
            scanline_count: 480.0,
        }
    }
}
