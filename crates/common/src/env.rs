//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the data directory exists; warn if the frontend bundle is missing.
pub async fn ensure_env(frontend_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        let frontend_dir = frontend_dir.display();
        warn!(%frontend_dir, "frontend bundle directory not found; only /api routes will respond");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_data_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let data_dir = root.join("nested").join("data");
        ensure_env(&root.join("dist"), &data_dir).await?;
        assert!(tokio::fs::metadata(&data_dir).await?.is_dir());

        // second call is a no-op
        ensure_env(&root.join("dist"), &data_dir).await?;

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
