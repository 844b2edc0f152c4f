//! Reelsmith CLI: turn app screenshots into a one-minute marketing video.
//!
//! Set GEMINI_API_KEY (or API_KEY). Other settings come from REELSMITH_* variables
//! and can be overridden per run with flags.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reelsmith_cli::{build_plan, format_progress, init_tracing, load_selection};
use reelsmith_client::{GenerationClient, VeoClient};
use reelsmith_core::{Config, GenerationProgress, PlaybackUrlPolicy};
use reelsmith_orchestrator::{AssemblyConfig, CancellationToken, VideoAssemblyOrchestrator};

#[derive(Parser)]
#[command(name = "reelsmith", about = "Screenshot-to-marketing-video generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video from screenshots and a prompt
    Generate {
        /// Directions for the video
        #[arg(long, short)]
        prompt: String,
        /// Screenshot files, in the order they should be used
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Maximum number of screenshots to use
        #[arg(long)]
        max_images: Option<usize>,
        /// Seconds between operation status checks
        #[arg(long)]
        poll_interval_secs: Option<u64>,
        /// Give up on an operation after this many status checks
        #[arg(long)]
        max_poll_attempts: Option<u32>,
        /// Print the raw service URL instead of one carrying the API key
        #[arg(long)]
        no_embed_key: bool,
        /// Print every progress snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what would be sent for the first segment without calling the service
    Plan {
        /// Directions for the video
        #[arg(long, short)]
        prompt: String,
        /// Screenshot files
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Maximum number of screenshots to use
        #[arg(long)]
        max_images: Option<usize>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prompt,
            images,
            max_images,
            poll_interval_secs,
            max_poll_attempts,
            no_embed_key,
            json,
        } => {
            if prompt.trim().is_empty() {
                anyhow::bail!("Please provide a video prompt");
            }

            let mut config = Config::from_env().context(
                "Failed to load configuration. Set GEMINI_API_KEY (or API_KEY)",
            )?;
            if let Some(max_images) = max_images {
                config.max_images = max_images;
            }
            if let Some(secs) = poll_interval_secs {
                config.poll_interval = Duration::from_secs(secs);
            }
            if max_poll_attempts.is_some() {
                config.max_poll_attempts = max_poll_attempts;
            }
            if no_embed_key {
                config.playback_url_policy = PlaybackUrlPolicy::Raw;
            }
            config.validate()?;

            let selection = load_selection(&images, config.max_images).await;
            if selection.is_empty() {
                anyhow::bail!("Please provide at least one readable image");
            }

            let client: Arc<dyn GenerationClient> = Arc::new(VeoClient::new(&config)?);
            let orchestrator = VideoAssemblyOrchestrator::new(client, AssemblyConfig::from(&config));

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling generation");
                    on_ctrl_c.cancel();
                }
            });

            let sink = move |progress: GenerationProgress| {
                if json {
                    match serde_json::to_string(&progress) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialize progress"),
                    }
                } else {
                    println!("{}", format_progress(&progress));
                }
            };

            let url = orchestrator
                .generate_with_cancel(selection.images(), &prompt, &sink, cancel)
                .await?;

            match url {
                Some(url) => println!("{}", url),
                None => anyhow::bail!("Video generation failed"),
            }
        }
        Commands::Plan {
            prompt,
            images,
            max_images,
        } => {
            let mut config = Config::settings_from_env().context("Failed to load configuration")?;
            if let Some(max_images) = max_images {
                config.max_images = max_images;
            }

            let selection = load_selection(&images, config.max_images).await;
            let plan = build_plan(&selection, &prompt, &config)?;
            print_json(&plan)?;
        }
    }

    Ok(())
}
