use std::collections::HashSet;
use std::sync::Arc;

use crate::api::ComputeApi;
use crate::error::SweepError;
use crate::models::{InstanceRecord, StateChange};

/// Lifecycle states discovery asks the provider for.
pub const STATE_FILTER: [&str; 2] = ["running", "terminated"];

/// Discovery-and-shutdown workflow over an injected provider client.
pub struct InstanceManager {
    api: Arc<dyn ComputeApi>,
}

impl InstanceManager {
    pub fn new(api: Arc<dyn ComputeApi>) -> Self {
        Self { api }
    }

    /// Enumerate instances matching the fixed state filter. The result is a
    /// snapshot; two calls are not guaranteed to agree.
    pub async fn list_all(&self) -> Result<Vec<InstanceRecord>, SweepError> {
        self.api.describe_instances(&STATE_FILTER).await
    }

    /// Stop every instance in `ids` with a single batch request. Does not
    /// guard against an empty collection; callers short-circuit that case.
    ///
    /// The provider acknowledges each instance it will act on. An
    /// acknowledgement that misses any requested id is a `PartialBatch`
    /// failure carrying the ids left out.
    pub async fn stop(&self, ids: &[String]) -> Result<Vec<StateChange>, SweepError> {
        let changes = self.api.stop_instances(ids).await?;
        let acknowledged: HashSet<&str> =
            changes.iter().map(|c| c.instance_id.as_str()).collect();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !acknowledged.contains(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(SweepError::PartialBatch {
                requested: ids.len(),
                acknowledged: changes.len(),
                missing,
            });
        }
        tracing::info!("Stop request accepted for {} instance(s)", changes.len());
        Ok(changes)
    }

    /// Re-enumerate and stop everything discovery returns.
    ///
    /// Ids are taken from every listed record, terminated instances
    /// included — the discovery filter covers both states. `Ok(None)` means
    /// nothing was found and no stop request was issued.
    pub async fn disable_all(&self) -> Result<Option<Vec<StateChange>>, SweepError> {
        let instances = self.list_all().await?;
        let ids: Vec<String> = instances.into_iter().map(|i| i.id).collect();
        if ids.is_empty() {
            tracing::info!("No running instances found");
            return Ok(None);
        }
        let changes = self.stop(&ids).await?;
        Ok(Some(changes))
    }

    /// The reporting entry point: list instances, log one line per record,
    /// then hand everything found to `disable_all` unconditionally. Callers
    /// wanting a confirmation or dry-run gate put it in front of this.
    pub async fn run_report(&self) -> Result<Option<Vec<StateChange>>, SweepError> {
        let instances = self.list_all().await?;
        for instance in &instances {
            tracing::info!(
                id = %instance.id,
                instance_type = %instance.instance_type,
                state = %instance.state,
                "Discovered instance"
            );
        }
        if instances.is_empty() {
            tracing::info!("No instances found");
            return Ok(None);
        }
        let result = self.disable_all().await?;
        if let Some(changes) = &result {
            tracing::info!("Disabled {} instance(s)", changes.len());
        }
        Ok(result)
    }
}
