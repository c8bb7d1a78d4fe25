pub mod instance_record;
pub mod state_change;

pub use instance_record::{InstanceRecord, InstanceState};
pub use state_change::StateChange;
