//! Provider adapters for cloudgate.
//!
//! A provider adapter exposes the four cloud capabilities the UI needs for a
//! single `(profile, region)` pair:
//!
//! - list pending manual approvals
//! - list pipelines together with their stage states
//! - submit an approval decision
//! - start a pipeline execution
//!
//! Adapters are short-lived. The task layer asks a [`ProviderFactory`] for a
//! fresh adapter for every task and drops it when the task completes.
//!
//! The only concrete adapter today is [`AwsCliProvider`], which drives
//! CodePipeline through the AWS CLI.
//!
//! # Example
//!
//! ```ignore
//! use cloudgate_api::{AwsCliFactory, ProviderFactory};
//! use std::time::Duration;
//!
//! let factory = AwsCliFactory::new(None, Duration::from_secs(30));
//! let adapter = factory.construct("dev", "us-west-2")?;
//! let pipelines = adapter.list_pipelines().await?;
//! ```

mod aws;
mod runner;
mod wire;

pub use aws::{AwsCliFactory, AwsCliProvider};
pub use runner::{CommandRunner, ProcessRunner};

use async_trait::async_trait;
use cloudgate_types::{ApprovalAction, PipelineStatus, ProviderContext, ProviderError};

/// The capability set of a cloud continuous-delivery provider.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Credentials scope this adapter was constructed for.
    fn context(&self) -> &ProviderContext;

    async fn list_pending_approvals(&self) -> Result<Vec<ApprovalAction>, ProviderError>;

    async fn list_pipelines(&self) -> Result<Vec<PipelineStatus>, ProviderError>;

    async fn submit_approval(&self, approval: &ApprovalAction, approve: bool, comment: &str) -> Result<(), ProviderError>;

    /// Starts `pipeline_name`. An empty `commit_id` uses the source HEAD.
    async fn start_pipeline_execution(&self, pipeline_name: &str, commit_id: &str) -> Result<(), ProviderError>;
}

/// Builds adapters for a `(profile, region)` pair.
pub trait ProviderFactory: Send + Sync {
    fn construct(&self, profile: &str, region: &str) -> Result<Box<dyn ProviderAdapter>, ProviderError>;
}
