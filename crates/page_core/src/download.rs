//! Fire-and-forget download of static assets such as the résumé.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tracing::{info, warn};

fn resolve_asset(assets_root: &Path, asset: &str) -> Result<PathBuf> {
    let relative = Path::new(asset.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        bail!("asset path is empty");
    }
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        bail!("asset path '{asset}' escapes the assets root");
    }
    Ok(assets_root.join(relative))
}

/// Copies `asset` (relative to `assets_root`) into `dest_dir`, keeping its
/// file name. Returns the written path.
pub async fn download_asset(assets_root: &Path, asset: &str, dest_dir: &Path) -> Result<PathBuf> {
    let source = resolve_asset(assets_root, asset)?;
    let file_name = source
        .file_name()
        .with_context(|| format!("asset path '{asset}' has no file name"))?;

    tokio::fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("failed to create download directory '{}'", dest_dir.display()))?;

    let target = dest_dir.join(file_name);
    let bytes = tokio::fs::copy(&source, &target).await.with_context(|| {
        format!(
            "failed to copy '{}' to '{}'",
            source.display(),
            target.display()
        )
    })?;
    info!(%asset, bytes, target = %target.display(), "asset downloaded");
    Ok(target)
}

/// Spawns [`download_asset`] and only logs the outcome.
pub fn spawn_asset_download(
    assets_root: PathBuf,
    asset: String,
    dest_dir: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = download_asset(&assets_root, &asset, &dest_dir).await {
            warn!(%asset, "asset download failed: {err:#}");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("page_core_{tag}_{suffix}"))
    }

    #[test]
    fn rejects_paths_leaving_the_root() {
        let root = Path::new("/srv/assets");
        assert!(resolve_asset(root, "../etc/passwd").is_err());
        assert!(resolve_asset(root, "").is_err());
        assert_eq!(
            resolve_asset(root, "/resume.pdf").expect("leading slash is fine"),
            root.join("resume.pdf")
        );
    }

    #[tokio::test]
    async fn copies_asset_into_destination() {
        let root = temp_root("download");
        let assets = root.join("public");
        fs::create_dir_all(&assets).expect("assets dir");
        fs::write(assets.join("resume.pdf"), b"%PDF-1.4").expect("write asset");

        let dest = root.join("downloads");
        let written = download_asset(&assets, "/resume.pdf", &dest)
            .await
            .expect("download");
        assert_eq!(written, dest.join("resume.pdf"));
        assert_eq!(fs::read(&written).expect("read back"), b"%PDF-1.4");

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn spawned_download_swallows_missing_asset() {
        let root = temp_root("missing");
        spawn_asset_download(root.join("public"), "resume.pdf".into(), root.join("out"))
            .await
            .expect("task completes without panicking");
        assert!(!root.join("out").join("resume.pdf").exists());
        let _ = fs::remove_dir_all(root);
    }
}
