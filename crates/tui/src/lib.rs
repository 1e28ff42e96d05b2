//! # cloudgate terminal UI
//!
//! An interactive terminal front end for cloud continuous-delivery services.
//! The operator walks a sequence of tabular screens (provider, credentials,
//! service, category, operation) and then inspects pipelines or acts on
//! manual approvals.
//!
//! ## Architecture
//!
//! - [`app`]: the application model and the message-driven `update`.
//! - [`navigation`]: the confirm/back state machine.
//! - [`screens`]: the static catalog and the table shown on each screen.
//! - [`cmd`]: executes task descriptors against a provider adapter.
//! - `ui`: terminal lifecycle, event loop, rendering and themes.
//!
//! Handlers never perform I/O. A transition that needs the cloud returns a
//! [`cloudgate_types::Task`]; the runtime spawns it and feeds the outcome back
//! through the same update path.

pub mod app;
pub mod cmd;
pub mod navigation;
pub mod screens;
mod ui;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use cloudgate_api::ProviderFactory;

pub use app::{App, update};
pub use ui::components::common::TextInputState;
pub use ui::theme::catalog::{THEME_DEFINITIONS, ThemeDefinition, resolve as resolve_theme};

/// Inputs supplied at startup.
pub struct RunOptions {
    /// AWS profiles offered on the configuration screen.
    pub profiles: Vec<String>,
    /// AWS regions offered once a profile is chosen.
    pub regions: Vec<String>,
    /// Builds a provider adapter for every task.
    pub factory: Arc<dyn ProviderFactory>,
    /// Preferred theme id or alias.
    pub theme: Option<String>,
}

/// Runs the terminal application until the operator quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into (or restored from)
/// raw mode and the alternate screen, or when drawing fails.
pub async fn run(options: RunOptions) -> Result<()> {
    ui::runtime::run_app(options).await
}
