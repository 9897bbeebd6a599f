//! Picks which of a Site's currently-active scheduled effects renders this tick.

use chrono::NaiveDateTime;

use crate::scheduled_effect::ScheduledEffect;

/// How long each rotation slot lasts, in seconds.
pub const SECONDS_PER_EFFECT: f64 = 30.0;

/// Index into a non-empty `active` slice, picked by wall-clock rotation.
///
/// `index = floor(elapsed_secs / SECONDS_PER_EFFECT) mod active_len`. The
/// rotation is driven by elapsed time since the site started, not by frame
/// count, so it advances identically regardless of render rate.
///
/// # Panics
/// Panics if `active_len == 0`; callers must check `active` is non-empty first.
#[must_use]
pub fn pick_effect_index(elapsed_secs: f64, active_len: usize) -> usize {
    assert!(active_len > 0, "pick_effect_index requires a non-empty active list");
    let slot = (elapsed_secs / SECONDS_PER_EFFECT).floor();
    let slot = if slot.is_sign_negative() { 0.0 } else { slot };
    (slot as usize) % active_len
}

/// Indices, in declared order, of the schedules active at `now_local`.
#[must_use]
pub fn select_active(effects: &[ScheduledEffect], now_local: NaiveDateTime) -> Vec<usize> {
    effects
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_active(now_local))
        .map(|(i, _)| i)
        .collect()
}
