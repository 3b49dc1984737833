//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates only import `service`.

use std::path::Path;

/// Ensure the data directory exists and report missing collection files.
pub async fn ensure_env(data_dir: &Path, files: &[&Path]) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_dir, files).await
}
