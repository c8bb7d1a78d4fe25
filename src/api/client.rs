use async_trait::async_trait;

use crate::error::SweepError;
use crate::models::{InstanceRecord, StateChange};

/// The two provider operations this tool consumes.
///
/// The instance manager is constructed against this trait rather than a
/// concrete SDK client, so tests can substitute a fake provider.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Describe instances whose lifecycle state matches one of `states`.
    /// Single page only; pagination is deliberately not handled.
    async fn describe_instances(&self, states: &[&str])
        -> Result<Vec<InstanceRecord>, SweepError>;

    /// Issue one batch stop request covering every id in `ids`. The provider
    /// shuts the instances down asynchronously; this call does not wait for
    /// completion.
    async fn stop_instances(&self, ids: &[String]) -> Result<Vec<StateChange>, SweepError>;
}
