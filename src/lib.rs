#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Multi-site LED animation server.
//!
//! Synthesizes RGB pixel frames at a fixed cadence for one or more physical
//! sites, and streams them, timestamped and optionally compressed, to
//! networked strip controllers. See `nd_core` for the pixel/codec layer,
//! `nd_effects` for the rendering capability and scheduler, `nd_net` for the
//! strip client and its connection state machine, and `nd_site` for the
//! per-site render loop and process-wide registry this crate wires together.

pub mod assembly;
pub mod cli;
pub mod config;
pub mod status;

pub use assembly::build_sites;
pub use cli::Cli;
pub use config::RootConfig;
