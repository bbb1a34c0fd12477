use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use lumen_core::{
    codec, create_gateway, export, AspectRatio, EncodedImage, HistoryStore, RequestOrchestrator,
    StudioConfig,
};

mod sample_prompts;

#[derive(Parser, Debug)]
#[clap(name = "Lumen", author, version = "0.1.0", about = "Lumen Image Studio")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, default_value = "lumen.yaml", help = "Configuration file path")]
    config: String,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an image from a prompt, or edit a source image
    Generate {
        prompt: String,

        #[clap(long, short, default_value = "1:1", help = "Aspect ratio (ignored when editing)")]
        aspect_ratio: String,

        #[clap(long, short, help = "Source image to edit")]
        image: Option<PathBuf>,

        #[clap(long, help = "Upscale the result before saving")]
        upscale: bool,

        #[clap(long, short, help = "Output path (defaults to a prompt-derived name)")]
        output: Option<PathBuf>,
    },
    /// Manage generation history
    History {
        #[clap(subcommand)]
        action: HistoryCommands,
    },
    /// Show sample prompts to try
    Prompts,
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent generations
    List,
    /// Clear all history
    Clear,
    /// Re-run a past prompt by its id
    Regenerate {
        id: String,

        #[clap(long, short, default_value = "1:1")]
        aspect_ratio: String,

        #[clap(long, short, help = "Output path (defaults to a prompt-derived name)")]
        output: Option<PathBuf>,
    },
}

/// Accepted upload formats. This mirrors the upload surface of the studio;
/// anything else is rejected before the core sees it.
fn media_type_for(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        other => anyhow::bail!(
            "Unsupported image format '{}'. Use PNG, JPEG, or WebP.",
            other
        ),
    }
}

fn load_source_image(path: &Path) -> Result<EncodedImage> {
    let media_type = media_type_for(path)?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(codec::encode(&bytes, media_type))
}

fn build_orchestrator(config: &StudioConfig) -> Result<RequestOrchestrator> {
    let gateway = create_gateway(&config.gateway)?;
    let history = HistoryStore::load(config.history_path());
    Ok(RequestOrchestrator::new(gateway, history)
        .with_thumbnail_dimension(config.thumbnail_max_dimension))
}

/// Saves the current session result, returning the path written.
fn save_result(orchestrator: &RequestOrchestrator, output: Option<PathBuf>) -> Result<PathBuf> {
    let result = orchestrator
        .session()
        .result
        .as_ref()
        .context("No result to save")?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(export::suggested_filename(&orchestrator.session().prompt)));
    let bytes = codec::decode_payload(&result.image)?;
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Turns an orchestrator failure into the session's user-visible message.
fn session_failure(orchestrator: &RequestOrchestrator) -> anyhow::Error {
    anyhow::anyhow!(orchestrator
        .session()
        .error
        .clone()
        .unwrap_or_else(|| "The request failed. Please try again.".to_string()))
}

async fn run_generate(
    config: &StudioConfig,
    prompt: &str,
    aspect_ratio: &str,
    image: Option<PathBuf>,
    upscale: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let aspect_ratio: AspectRatio = aspect_ratio.parse()?;
    let source_image = image.as_deref().map(load_source_image).transpose()?;

    let mut orchestrator = build_orchestrator(config)?;
    if orchestrator
        .submit_generation(prompt, source_image, aspect_ratio)
        .await
        .is_err()
    {
        return Err(session_failure(&orchestrator));
    }

    if upscale {
        log::info!("Upscaling result...");
        if orchestrator.submit_upscale().await.is_err() {
            // The pre-upscale result is intact; save it and report.
            let path = save_result(&orchestrator, output)?;
            eprintln!(
                "{}",
                orchestrator.session().error.as_deref().unwrap_or_default()
            );
            println!("Saved non-upscaled result to {}", path.display());
            return Ok(());
        }
    }

    let path = save_result(&orchestrator, output)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn run_history_list(config: &StudioConfig) {
    let history = HistoryStore::load(config.history_path());
    if history.items().is_empty() {
        println!("No history yet.");
        return;
    }
    for item in history.items() {
        let when = Local
            .timestamp_millis_opt(item.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| item.timestamp.to_string());
        println!("{}  {}  {}", item.id, when, item.prompt);
    }
}

async fn run_history_regenerate(
    config: &StudioConfig,
    id: &str,
    aspect_ratio: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let aspect_ratio: AspectRatio = aspect_ratio.parse()?;
    let mut orchestrator = build_orchestrator(config)?;
    orchestrator.set_aspect_ratio(aspect_ratio);

    let item = orchestrator
        .history()
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .with_context(|| format!("No history item with id {}", id))?;

    if orchestrator.regenerate_from_history(&item).await.is_err() {
        return Err(session_failure(&orchestrator));
    }

    let path = save_result(&orchestrator, output)?;
    println!("Saved {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let config = StudioConfig::load(&cli.config)?;

    match cli.command {
        Commands::Generate {
            prompt,
            aspect_ratio,
            image,
            upscale,
            output,
        } => run_generate(&config, &prompt, &aspect_ratio, image, upscale, output).await,
        Commands::History { action } => match action {
            HistoryCommands::List => {
                run_history_list(&config);
                Ok(())
            }
            HistoryCommands::Clear => {
                let mut history = HistoryStore::load(config.history_path());
                history.clear();
                println!("History cleared.");
                Ok(())
            }
            HistoryCommands::Regenerate {
                id,
                aspect_ratio,
                output,
            } => run_history_regenerate(&config, &id, &aspect_ratio, output).await,
        },
        Commands::Prompts => {
            for (category, prompts) in sample_prompts::SAMPLE_PROMPTS {
                println!("{}", category);
                for prompt in *prompts {
                    println!("  - {}", prompt);
                }
                println!();
            }
            Ok(())
        }
    }
}
