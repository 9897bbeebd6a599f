//! The process-wide, immutable list of Sites.
//!
//! Per the source's global-site-list design, the contract — one registry per
//! process, built at startup, never mutated afterward — is preserved, but
//! the registry is an explicit value passed to observer components rather
//! than a free-floating singleton.

use crate::site::{Site, SiteHandle};

pub struct SiteRegistry {
    handles: Vec<SiteHandle>,
}

impl SiteRegistry {
    /// Starts every Site's render thread and strip workers and collects
    /// their status handles.
    #[must_use]
    pub fn start_all(sites: Vec<Site>) -> Self {
        let handles = sites.into_iter().map(Site::start).collect();
        Self { handles }
    }

    #[must_use]
    pub fn handles(&self) -> &[SiteHandle] {
        &self.handles
    }

    /// Minimum `spare_ms` across every Site, for the external status line.
    #[must_use]
    pub fn global_min_spare_ms(&self) -> Option<i64> {
        self.handles.iter().map(SiteHandle::spare_ms).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_has_no_minimum_spare() {
        let registry = SiteRegistry { handles: Vec::new() };
        assert_eq!(registry.global_min_spare_ms(), None);
    }
}
