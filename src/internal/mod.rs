//! Internal utilities.

mod circular;

pub(crate) use circular::with_circular_catch;
