pub mod instance_service;

// Re-export commonly used types
pub use instance_service::{InstanceManager, STATE_FILTER};
