use std::env;
use std::path::Path;

// Default configuration constants
pub const DEFAULT_REGION: &str = "us-east-1";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Explicit region override. `None` when unset, so the SDK's own region
/// resolution (profile, AWS_REGION, instance metadata) stays in charge.
pub fn get_region() -> Option<String> {
    sanitize_region(&env::var("SWEEP_REGION").unwrap_or_default())
}

pub fn sanitize_region(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
