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
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
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

//! Interactive textured Earth globe rendered with wgpu.
//!
//! Pointer drags become a damped rotation and zoom state, a view transform
//! is rebuilt from it every frame, and a 2D chrome layer (toolbar, corner
//! buttons, a sliding menu panel, and a stats readout) is drawn over the
//! globe in an orthographic pass.
//!
//! # Key entry points
//!
//! - [`GlobeEngine`] - owns the view, overlay and layer state; every user
//!   operation is a [`GlobeCommand`] passed to [`GlobeEngine::execute`]
//! - [`camera::ViewController`] - rotation, zoom, momentum and auto-rotate
//! - [`overlay::Overlay`] - chrome layout, hit testing and quads
//! - [`options::ConfigStore`] - snapshot persistence
//! - `Viewer` (feature `viewer`) - the standalone winit window
//!
//! # Architecture
//!
//! Window events go through an [`input::InputProcessor`], which emits
//! commands. The engine routes pointer presses to the overlay first and
//! only starts a globe drag when no chrome was hit. Each frame advances
//! the controller, the camera animation and the panel easing, then draws
//! the globe (one of four view modes, optionally with an atmosphere shell)
//! followed by the overlay quads.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod options;
pub mod overlay;
pub mod renderer;
pub mod texture;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::command::GlobeCommand;
pub use engine::GlobeEngine;
pub use error::TerraError;
pub use input::{InputEvent, InputProcessor, KeyBindings, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
