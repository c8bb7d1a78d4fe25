use serde::Serialize;

use crate::models::instance_record::InstanceState;

/// One entry of the provider's batch-stop acknowledgement: the instance and
/// the state transition it was put on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub instance_id: String,
    pub previous_state: InstanceState,
    pub current_state: InstanceState,
}
