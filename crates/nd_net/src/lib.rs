#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Networked delivery of rendered frames to strip controllers: a bounded
//! frame queue, connection state machine, and the strip client the Site
//! render thread talks to.

pub mod client;
pub mod error;
pub mod queue;
pub mod state;

pub use client::{run_send_worker, StripClient};
pub use error::{Result, StripError};
pub use queue::{FrameQueue, QUEUE_CAPACITY};
pub use state::ConnectionState;
