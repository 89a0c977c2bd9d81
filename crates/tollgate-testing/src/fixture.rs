//! Contract fixture loader.
//!
//! Loads trigger payloads and cleanup bodies from `contracts/` at the workspace root.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Load a JSON fixture file relative to the workspace root.
///
/// # Example
/// ```no_run
/// use tollgate_testing::fixture::Fixture;
/// let event = Fixture::load("contracts/triggers/pre_sign_up.json");
/// ```
pub struct Fixture;

impl Fixture {
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = Self::resolve(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {relative_path}: {e}"))
    }

    /// Load and deserialize into `T`. Panics on shape mismatch.
    pub fn load_as<T: DeserializeOwned>(relative_path: &str) -> T {
        serde_json::from_value(Self::load(relative_path))
            .unwrap_or_else(|e| panic!("fixture {relative_path} does not match type: {e}"))
    }

    /// First ancestor of the calling crate that contains `relative_path`.
    fn resolve(relative_path: &str) -> PathBuf {
        let start = std::env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|_| std::env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));
        start
            .ancestors()
            .map(|dir| dir.join(relative_path))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| Path::new(&start).join(relative_path))
    }
}
