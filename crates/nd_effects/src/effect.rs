//! The rendering capability every effect implements.

use std::time::SystemTime;

use nd_core::GraphicsSurface;

/// A stateful pixel producer.
///
/// Concrete effects are plain structs implementing this trait — no
/// inheritance chain, per the source's polymorphic-effects redesign note.
/// `render` mutates `surface` in place; effects that animate keep their own
/// state (a phase counter, a last-update timestamp, ...) in `self`.
pub trait Effect: Send {
    fn render(&mut self, surface: &mut GraphicsSurface<'_>, now: SystemTime);

    /// Short, stable name recorded as a Site's `current_effect_name`.
    fn name(&self) -> &str;
}
