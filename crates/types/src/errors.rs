//! Errors surfaced to the operator in the status line.

use thiserror::Error;

/// Failure reported by a provider adapter or by the task that drove it.
///
/// Errors are values on the application model, so they are cloneable and
/// comparable rather than wrapping foreign error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The adapter could not be built (bad profile/region, missing tooling).
    #[error("failed to initialize {provider} provider: {reason}")]
    AdapterConstruction { provider: String, reason: String },

    /// A capability call failed (network, permissions, not found, timeout).
    #[error("{operation} failed: {reason}")]
    CapabilityFailure { operation: String, reason: String },
}

impl ProviderError {
    pub fn construction(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AdapterConstruction {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn capability(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CapabilityFailure {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
