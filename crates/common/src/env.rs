//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists at startup.

use std::path::Path;
use tracing::{info, warn};

/// Create the data directory if needed and report which collection files are present.
pub async fn ensure_data_dir(data_dir: &Path, files: &[&Path]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    for file in files {
        if tokio::fs::metadata(file).await.is_ok() {
            info!(file = %file.display(), "collection file found");
        } else {
            warn!(file = %file.display(), "collection file missing; starting with an empty collection");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_data_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("ensure_data_dir_{}", uuid::Uuid::new_v4()));
        let file = dir.join("records.json");
        ensure_data_dir(&dir, &[file.as_path()]).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
