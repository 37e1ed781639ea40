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

//! Animated playback of k-means clustering served by a remote backend.
//!
//! Clusterscope fetches a synthetic 2-D dataset and a precomputed k-means
//! run from a clustering service, then lets the user step through the run one
//! iteration at a time. Each step recolors the points by cluster and moves
//! the centroid markers, with eased transitions between snapshots.
//!
//! # Key entry points
//!
//! - [`session::Session`] - owns all state and runs the generate, run and
//!   advance workflows
//! - [`playback::Playback`] - the dataset / run / cursor state machine
//! - [`scene::Scene`] - retained markers and their transitions
//! - [`geometry::GeometryMapper`] - data to pixel scales
//! - [`options::Options`] - runtime configuration (backend, chart,
//!   animation, style)
//!
//! # Architecture
//!
//! Backend calls are the only blocking points. They run either inline or on
//! a [`backend::worker::RequestWorker`] thread whose replies the event loop
//! drains with [`session::Session::pump`]. Every request carries a ticket, so
//! replies that arrive after their workflow moved on are ignored. Controls
//! are never stored: [`affordance::Affordances::derive`] recomputes them from
//! the playback state after every transition.

pub mod affordance;
pub mod backend;
pub mod error;
pub mod geometry;
pub mod model;
pub mod options;
pub mod playback;
pub mod scene;
pub mod session;
pub mod util;
