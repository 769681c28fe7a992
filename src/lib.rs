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
// Complexity limits (thresholds in clippy.toml)
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

//! Interactive gallery of real-time 3D rendering samples built on wgpu.
//!
//! Vista is a catalog browser: twelve categories of small samples (basics,
//! materials, lights, shaders, post-processing and more), each with a live
//! parameter panel and a rendering surface it draws into.
//!
//! # Key entry points
//!
//! - [`Gallery`] - catalog, navigation, shell and sample mount wired together
//! - [`SampleRegistry`] - (category, sample) → sample constructor mapping
//! - [`Sample`] - what one sample implements: parameters and a per-frame
//!   [`Scene`] update
//! - [`RenderSurface`] / [`SurfaceFactory`] - the rendering back end seam,
//!   implemented with wgpu in [`gpu`]
//! - [`Options`] - start-up configuration (window, navigation, shared
//!   surface, panel, keybindings)
//!
//! # Architecture
//!
//! The address (`/`, `/category/<id>`, `/category/<id>/<sample>`) is the
//! single source of truth. UI actions queue navigation; [`Gallery::pump`]
//! commits it, derives the selection and mounts at most one sample. A mount
//! owns the sample, its [`ParameterPanel`] and its surface, and all three
//! are dropped before the next sample's surface is created.

pub mod catalog;
pub mod error;
pub mod gallery;
pub mod gpu;
pub mod input;
pub mod navigation;
pub mod options;
pub mod panel;
pub mod registry;
pub mod route;
pub mod sample;
mod samples;
pub mod scene;
pub mod shell;
pub mod surface;
pub mod util;
pub mod views;

#[cfg(feature = "gui")]
pub mod gui;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use catalog::{Catalog, CategoryDescriptor};
pub use error::VistaError;
pub use gallery::{Gallery, UiAction};
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
pub use panel::{PanelSpec, ParameterPanel};
pub use registry::{SampleEntry, SampleRegistry};
pub use route::Route;
pub use sample::{FrameInput, Sample};
pub use scene::Scene;
pub use shell::ShellView;
pub use surface::{RenderSurface, SurfaceConfig, SurfaceFactory};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
