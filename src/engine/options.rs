//! Options methods for [`Explorer`].

use std::path::Path;

use web_time::Duration;

use super::Explorer;
use crate::error::AtlasError;
use crate::options::Options;
use crate::renderer::RenderBackend;

impl<B: RenderBackend> Explorer<B> {
    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and push them to every subsystem. Takes effect on
    /// the next command or tick.
    pub fn set_options(&mut self, options: Options) {
        if let Err(e) = options.validate() {
            log::warn!("applying options anyway: {e}");
        }
        self.options = options;
        self.apply_options();
    }

    /// Load a TOML preset and apply it.
    ///
    /// # Errors
    ///
    /// Any error from [`Options::load`]; the current options stay in
    /// place.
    pub fn load_preset(&mut self, path: &Path) -> Result<(), AtlasError> {
        let options = Options::load(path)?;
        self.set_options(options);
        Ok(())
    }

    fn apply_options(&mut self) {
        self.camera.set_options(&self.options.camera);
        self.adapter.picker_mut().set_min_interval(Duration::from_millis(
            self.options.interaction.pick_interval_ms,
        ));
        self.input.set_keybindings(self.options.keybindings.clone());
        // An ambient overlay owns bloom while it runs and restores its own
        // snapshot on stop.
        if !self.ambient.is_active() {
            self.backend
                .set_bloom_strength(self.options.post_processing.bloom_strength);
        }
        // Dim style may have changed.
        self.layers.mark_dirty();
    }
}
