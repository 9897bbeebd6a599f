//! Error types for site construction and registry startup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error(
        "strip {strip_index} of site \"{site_name}\" covers [{offset}, {end}) but the site buffer is only {buffer_len} pixels"
    )]
    StripOutOfBounds {
        site_name: String,
        strip_index: usize,
        offset: usize,
        end: usize,
        buffer_len: usize,
    },

    #[error("site \"{0}\" has no scheduled effects")]
    NoEffects(String),
}

pub type Result<T> = std::result::Result<T, SiteError>;
