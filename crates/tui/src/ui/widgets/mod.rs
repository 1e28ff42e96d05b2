//! Small, stateless UI widgets.

pub mod hints;

pub use hints::draw_hints;
