#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Effect capability trait, a small built-in catalog, and the scheduled
//! rotation logic a Site uses to pick which effect renders each tick.

pub mod builtin;
pub mod effect;
pub mod schedule;
pub mod scheduled_effect;
pub mod selector;

pub use builtin::{Rainbow, SolidColor};
pub use effect::Effect;
pub use schedule::Schedule;
pub use scheduled_effect::ScheduledEffect;
pub use selector::{pick_effect_index, select_active, SECONDS_PER_EFFECT};
