#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Ties a pixel buffer, a set of scheduled effects, and a set of strip
//! clients together into one Site, and a set of Sites into a process-wide
//! registry.

pub mod error;
pub mod registry;
pub mod site;

pub use error::{Result, SiteError};
pub use registry::SiteRegistry;
pub use site::{Site, SiteHandle, StripSpec, StripStatus, TickOutcome};
