//! UI rendering module for the terminal application.
//!
//! `main` draws a frame from the application model, `runtime` owns the
//! terminal and the event loop, `theme` holds the palettes.

pub mod components;
pub mod main;
pub mod runtime;
pub mod theme;
pub mod widgets;
