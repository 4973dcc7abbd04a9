//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the flat-file data directory exists.
///
/// On a read-only host the directory may legitimately be missing; that is
/// only worth a warning, so `create` controls whether we try to make it.
pub async fn ensure_data_dir(data_dir: &str, create: bool) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_dir).await.is_ok() {
        return Ok(());
    }
    if !create {
        warn!(%data_dir, "data directory not found; catalog reads will be empty");
        return Ok(());
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_dir_only_when_asked() -> anyhow::Result<()> {
        let base = std::env::temp_dir().join(format!("storefront_env_{}", std::process::id()));
        let dir = base.join("data");
        let dir_str = dir.to_string_lossy().to_string();

        ensure_data_dir(&dir_str, false).await?;
        assert!(tokio::fs::metadata(&dir).await.is_err());

        ensure_data_dir(&dir_str, true).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());

        let _ = tokio::fs::remove_dir_all(&base).await;
        Ok(())
    }
}
