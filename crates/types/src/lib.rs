//! Shared type definitions for cloudgate.
//!
//! The types in this crate are passive values exchanged between the provider
//! adapter, the navigation engine and the terminal runtime:
//!
//! - [`domain`]: catalog entities and the records returned by a provider.
//! - [`screen`]: the finite set of screens the UI can display.
//! - [`task`]: task descriptors produced by navigation and the outcomes that
//!   the task layer posts back.
//! - [`errors`]: the error kinds surfaced to the operator.

pub mod domain;
pub mod errors;
pub mod screen;
pub mod task;

pub use domain::{ApprovalAction, Category, CloudProvider, Operation, PipelineStatus, ProviderContext, Service, StageStatus};
pub use errors::ProviderError;
pub use screen::Screen;
pub use task::{Msg, Task, TaskOutcome};
