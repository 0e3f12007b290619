//! wgpu implementation of the render boundary.
//!
//! [`WgpuBackend`] draws the explorer's instanced meshes into a
//! host-provided texture view and serves pick readbacks. Post-processing
//! stays with the host; the backend only stores the bloom strength the
//! ambient engines ask for.

/// Growable typed storage buffers.
pub mod dynamic_buffer;
/// Device, queue, and optional surface.
pub mod render_context;
/// The [`crate::renderer::RenderBackend`] implementation.
pub mod wgpu_backend;

pub use render_context::{RenderContext, RenderContextError};
pub use wgpu_backend::WgpuBackend;
