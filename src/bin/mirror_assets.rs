//! Offline pre-mirroring of object-store buckets into the local static
//! tree, so deploys ship with warm image caches.

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use taverna_backend::config::SiteConfig;
use taverna_backend::infrastructure::storage;
use taverna_backend::services::mirror::mirror_bucket;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bucket to mirror (defaults to the menu bucket)
    #[arg(short, long)]
    bucket: Option<String>,

    /// Mirror only keys under this folder
    #[arg(long)]
    prefix: Option<String>,

    /// Skip everything that is not WebP
    #[arg(long, default_value_t = false)]
    only_webp: bool,

    /// Override the static root directory
    #[arg(long)]
    static_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taverna_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = SiteConfig::from_env();
    if let Some(static_root) = args.static_root {
        config.static_root = static_root;
    }

    let bucket = args.bucket.unwrap_or_else(|| config.menu_bucket.clone());
    anyhow::ensure!(
        bucket == config.menu_bucket || bucket == config.gallery_bucket,
        "Unknown bucket '{bucket}'"
    );

    let store = storage::setup_storage(&config).await;

    info!(
        "🪞 Mirroring '{}' into {}...",
        bucket,
        config.static_root.display()
    );

    let report = mirror_bucket(
        store.as_ref(),
        &bucket,
        &config.static_root,
        args.prefix.as_deref(),
        args.only_webp,
    )
    .await;

    info!(
        "✅ Done: {} mirrored, {} skipped, {} failed",
        report.mirrored, report.skipped, report.failed
    );

    Ok(())
}
