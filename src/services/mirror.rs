use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::services::storage::ObjectStore;

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct MirrorReport {
    pub mirrored: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Copy a bucket's objects into `{static_root}/{bucket}/...` so the image
/// delivery route can serve them as local hits.
///
/// Already-present files and (optionally) non-WebP objects are skipped.
/// Per-object failures are counted and logged, never fatal.
pub async fn mirror_bucket(
    storage: &dyn ObjectStore,
    bucket: &str,
    static_root: &Path,
    prefix: Option<&str>,
    only_webp: bool,
) -> MirrorReport {
    let mut report = MirrorReport::default();

    let start = match prefix {
        Some(p) if !p.is_empty() => format!("{}/", p.trim_end_matches('/')),
        _ => String::new(),
    };

    // Walk folders iteratively; `pending` holds prefixes ending in `/`.
    let mut pending = vec![start];
    let mut keys = Vec::new();

    while let Some(dir) = pending.pop() {
        let entries = match storage.list_folder(bucket, &dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("📂 Failed to list {bucket}/{dir}: {e}");
                report.failed += 1;
                continue;
            }
        };
        for entry in entries {
            let full = format!("{dir}{}", entry.name);
            if entry.is_folder {
                pending.push(format!("{full}/"));
            } else {
                keys.push(full);
            }
        }
    }

    for key in keys {
        if only_webp && !key.ends_with(".webp") {
            report.skipped += 1;
            continue;
        }

        let local = static_root.join(bucket).join(&key);
        if tokio::fs::try_exists(&local).await.unwrap_or(false) {
            report.skipped += 1;
            continue;
        }

        let data = match storage.download(bucket, &key).await {
            Ok(data) => data,
            Err(e) => {
                warn!("⬇️  Failed to download {bucket}/{key}: {e}");
                report.failed += 1;
                continue;
            }
        };

        if let Some(parent) = local.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("💾 Failed to create {}: {e}", parent.display());
                report.failed += 1;
                continue;
            }
        }

        match tokio::fs::write(&local, data).await {
            Ok(()) => report.mirrored += 1,
            Err(e) => {
                warn!("💾 Failed to write {}: {e}", local.display());
                report.failed += 1;
            }
        }
    }

    info!(
        "🪞 Mirror of '{bucket}' done: {} mirrored, {} skipped, {} failed",
        report.mirrored, report.skipped, report.failed
    );

    report
}
