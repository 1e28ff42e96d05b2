//! UI components.

pub mod common;
