// Provider API modules
pub mod client;
pub mod ec2;

// Re-export commonly used types
pub use client::ComputeApi;
pub use ec2::Ec2Api;
