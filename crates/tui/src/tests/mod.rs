//! Cross-module tests that drive the model through `update` the way the
//! runtime does.

mod properties;
mod support;
