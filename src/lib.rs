// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-instanced 3D explorer for channel/block curation graphs.
//!
//! A precomputed graph payload (channels containing blocks) is parsed once
//! into an immutable [`graph::GraphIndex`]. Pure layout functions map it onto
//! one of four 3D topologies, a render adapter keeps one flat attribute array
//! per instance attribute in sync with the GPU, and interaction controllers
//! layer highlighting, filtering, path finding, and ambient animation over
//! the same buffers.
//!
//! # Key entry points
//!
//! - [`engine::Explorer`] - the interactive session (one per loaded graph)
//! - [`engine::ExplorerCommand`] - the typed command vocabulary
//! - [`graph::GraphIndex`] - parsed graph and derived lookups
//! - [`layout::LayoutKind`] - the four deterministic layouts
//! - [`renderer::RenderBackend`] - the 3D engine boundary
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Frame loop
//!
//! The host calls [`engine::Explorer::tick`] once per animation frame with
//! the current wall-clock instant. Transitions, ambient animation, camera
//! motion, and debounced search all advance from that single tick; there
//! are no hidden timers or threads.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod graph;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod options;
pub mod renderer;
pub mod state;
pub mod util;
