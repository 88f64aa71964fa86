/// Soul Bucket Indexer - tags and cover art of FLAC objects, fetched by range
use clap::{Parser, Subcommand};
use soul_bucket_indexer::{
    fixture::parse_tag, inspect, render_table, render_tags, rows_with_urls, Fixture,
    IndexerConfig,
};
use soul_bucket_scan::BucketIndexer;
use soul_remote::LocalStore;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-bucket-indexer")]
#[command(about = "Index FLAC metadata in a bucket without downloading audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every FLAC object in a bucket
    Index {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory whose sub-directories are buckets
        #[arg(long, env = "SOUL_INDEXER_ROOT")]
        root: Option<PathBuf>,
        /// Bucket to index
        #[arg(short, long)]
        bucket: Option<String>,
        /// Number of fetch workers
        #[arg(short, long)]
        workers: Option<usize>,
        /// Print tracks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode one FLAC file or URL and print its tags
    Inspect {
        /// Local path or http(s) URL
        target: String,
        /// Minimum bytes per range read
        #[arg(long, default_value_t = soul_remote::DEFAULT_MIN_CHUNK_SIZE)]
        chunk_size: usize,
        /// Print the track as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a metadata-only FLAC fixture
    Fixture {
        /// Output file
        path: PathBuf,
        /// Comment entry, repeatable
        #[arg(short, long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag_arg)]
        tags: Vec<String>,
        /// Front cover image
        #[arg(long)]
        cover: Option<PathBuf>,
        /// Zero bytes appended after the metadata
        #[arg(long, default_value_t = soul_remote::DEFAULT_MIN_CHUNK_SIZE)]
        audio_bytes: usize,
    },
}

fn parse_tag_arg(raw: &str) -> Result<String, String> {
    parse_tag(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soul_bucket_indexer=info,soul_bucket_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            config,
            root,
            bucket,
            workers,
            json,
        } => {
            let mut config = IndexerConfig::load(config.as_deref())?;
            if let Some(root) = root {
                config.store.root = root;
            }
            if let Some(bucket) = bucket {
                config.store.bucket = bucket;
            }
            if let Some(workers) = workers {
                config.scan.workers = workers;
            }
            config.validate()?;

            index(config, json).await?;
        }
        Commands::Inspect {
            target,
            chunk_size,
            json,
        } => {
            let track = inspect(&target, chunk_size).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&track)?);
            } else {
                print!("{}", render_tags(&track));
            }
        }
        Commands::Fixture {
            path,
            tags,
            cover,
            audio_bytes,
        } => {
            let mut fixture = Fixture {
                tags,
                audio_bytes,
                ..Fixture::default()
            };
            if let Some(cover) = cover {
                fixture = fixture.with_cover_file(&cover).await?;
            }
            fixture.write(&path).await?;
        }
    }

    Ok(())
}

async fn index(config: IndexerConfig, json: bool) -> anyhow::Result<()> {
    tracing::info!("Store root: {}", config.store.root.display());

    let store = Arc::new(LocalStore::new(config.store.root.clone()));
    let ttl = config.scan.signed_url_ttl();
    let indexer = BucketIndexer::new(store.clone(), config.scan.clone());

    // Ctrl-C stops the workers; tracks decoded so far are still printed
    let cancel = indexer.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping workers");
            cancel.cancel();
        }
    });

    let (tracks, stats) = indexer.collect(&config.store.bucket).await?;
    let rows = rows_with_urls(store.as_ref(), &tracks, ttl).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }

    for (locator, error) in &stats.failures {
        tracing::warn!("Skipped {}: {}", locator, error);
    }
    tracing::info!(
        "{} of {} objects indexed, {} failed",
        stats.decoded,
        stats.discovered,
        stats.failed()
    );

    Ok(())
}
