use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::renderer::DimStyle;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
/// Highlighting, search, and picking parameters.
pub struct InteractionOptions {
    /// Quiet period after the last keystroke before a search runs.
    #[schemars(title = "Search Debounce (ms)", range(min = 0, max = 1000), extend("step" = 10))]
    pub search_debounce_ms: u64,
    /// Maximum similarity results.
    #[schemars(title = "Similar Blocks", range(min = 1, max = 100))]
    pub similarity_top_n: usize,
    /// Look of everything a highlight leaves out.
    #[schemars(skip)]
    pub dim: DimStyle,
    /// Scale factor of the hovered node.
    #[schemars(title = "Hover Scale", range(min = 1.0, max = 3.0), extend("step" = 0.05))]
    pub hover_scale: f32,
    /// Scale factor of the selected node.
    #[schemars(title = "Selection Scale", range(min = 1.0, max = 3.0), extend("step" = 0.05))]
    pub selection_scale: f32,
    /// Minimum interval between hover pick readbacks.
    #[schemars(title = "Pick Interval (ms)", range(min = 0, max = 200))]
    pub pick_interval_ms: u64,
    /// Maximum gallery entries.
    #[schemars(skip)]
    pub gallery_limit: usize,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            search_debounce_ms: 150,
            similarity_top_n: 20,
            dim: DimStyle::default(),
            hover_scale: 1.6,
            selection_scale: 1.9,
            pick_interval_ms: 33,
            gallery_limit: 48,
        }
    }
}
