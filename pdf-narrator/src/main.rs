//! narrate - Convert PDF documents to spoken audio using OpenAI TTS

mod audio;
mod config;
mod pdf;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::NarratorConfig;
use openai_client::{OpenAiProvider, RetryPolicy};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "narrate")]
#[command(about = "Convert PDF documents to spoken audio using OpenAI text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF file
    pdf_file: Option<PathBuf>,

    /// Output file path (default: outputs/<pdf-name>_<timestamp>.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice to use for synthesis
    #[arg(long)]
    voice: Option<String>,

    /// Process only the first chunk to preview output quality
    #[arg(long)]
    test: bool,

    /// Clean the extracted text with the chat model before synthesis
    #[arg(long)]
    clean: bool,

    /// Continue with the raw text if the cleanup stage fails
    #[arg(long)]
    fallback_raw: bool,

    /// Skip the cost confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the default voice
    SetVoice {
        /// Voice name (alloy, echo, fable, onyx, nova, shimmer)
        voice: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let pdf_path = args
        .pdf_file
        .clone()
        .ok_or_else(|| anyhow::anyhow!("PDF file path is required. Run 'narrate --help' for usage."))?;

    if !pdf_path.exists() {
        anyhow::bail!("PDF file not found: {}", pdf_path.display());
    }

    // Load configuration
    let config = NarratorConfig::load().context("Failed to load configuration")?;

    // Credentials are checked before any extraction or API work happens
    let provider = OpenAiProvider::from_env(&config.chat_model, &config.speech_model)
        .context("Failed to initialize the OpenAI client")?;

    let voice = args.voice.clone().unwrap_or_else(|| config.voice.clone());

    // Determine output path
    let output_path = match args.output.clone() {
        Some(path) => path,
        None => {
            let stem = pdf_path.file_stem().unwrap_or_default();
            PathBuf::from("outputs").join(timestamped_filename(&stem.to_string_lossy(), args.test))
        }
    };
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    if args.debug {
        eprintln!("PDF: {}", pdf_path.display());
        eprintln!("Output: {}", output_path.display());
        eprintln!("Voice: {}", voice);
        eprintln!("Cleanup: {}", args.clean);
    }

    eprintln!("Starting PDF to speech conversion");
    if args.test {
        eprintln!("Running in test mode - only the first chunk will be processed");
    }
    eprintln!("Output will be saved as: {}", output_path.display());

    // Extract text
    let mut raw_text = pdf::extract_text(&pdf_path).context("Failed to extract text")?;

    if raw_text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from the PDF");
    }

    // In test mode, only take the first chunk
    if args.test {
        let chunks = text::chunker::split_text(&raw_text, config.test_chunk_size);
        raw_text = chunks.into_iter().next().unwrap_or_default();
        eprintln!("Test mode: using first chunk ({} characters)", raw_text.len());
    }

    // Show the cost estimate before committing to any API spend
    let estimate = text::estimator::estimate(&raw_text, &config);
    eprintln!("\nCost estimate for conversion:");
    display_statistics(&estimate, args.clean);

    if !args.yes && !confirm("Do you want to proceed with the conversion?")? {
        eprintln!("Operation cancelled.");
        return Ok(());
    }

    let start = Instant::now();

    let retry = RetryPolicy::new(
        config.max_retry_attempts,
        Duration::from_secs(config.retry_delay_seconds),
    );

    // Optional cleanup stage
    let final_text = if args.clean {
        eprintln!("\nFormatting text for better speech output...");
        match text::formatter::format_text(&provider, &retry, &raw_text, config.cleanup_chunk_size)
            .await
        {
            Ok(cleaned) => {
                eprintln!("Text formatting complete");
                cleaned
            }
            Err(e) if args.fallback_raw => {
                eprintln!("Text cleanup failed ({}); continuing with raw text", e);
                raw_text
            }
            Err(e) => anyhow::bail!("Text cleanup failed: {}", e),
        }
    } else {
        raw_text
    };

    // Synthesis and combination
    audio::synthesizer::synthesize_to_file(
        &provider,
        &final_text,
        &output_path,
        &voice,
        config.tts_chunk_size,
    )
    .await?;

    let metadata = std::fs::metadata(&output_path)?;
    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);

    eprintln!("\nOutput: {} ({:.1} MB)", output_path.display(), size_mb);
    eprintln!("Total processing time: {:.1} seconds", start.elapsed().as_secs_f64());

    if args.test {
        eprintln!("\nTest completed. Check the output file for quality, then run without --test for the full document.");
    }

    Ok(())
}

/// Print text statistics and the cost breakdown.
///
/// The formatting line only appears when the cleanup stage is enabled, and
/// the total follows suit.
fn display_statistics(estimate: &text::estimator::CostEstimate, show_formatting_cost: bool) {
    eprintln!("Text statistics:");
    eprintln!("  Characters: {}", estimate.characters);
    eprintln!("  Estimated tokens: {}", estimate.tokens);
    eprintln!("  Chunks needed: {}", estimate.chunks);
    eprintln!("Cost breakdown:");
    if show_formatting_cost {
        eprintln!("  Text formatting (GPT): ${:.3}", estimate.gpt_cost);
    }
    eprintln!("  Text-to-speech: ${:.2}", estimate.tts_cost);
    let total = if show_formatting_cost {
        estimate.total_cost
    } else {
        estimate.tts_cost
    };
    eprintln!("  Total estimated cost: ${:.2}", total);
}

/// Ask the user a y/n question on stderr/stdin.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("\n{} (y/n): ", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// Generate an output filename with a timestamp, e.g.
/// `report_test_20240131_093050.mp3`.
fn timestamped_filename(base_name: &str, test_mode: bool) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let suffix = if test_mode { "_test" } else { "" };
    format!("{}{}_{}.mp3", base_name, suffix, timestamp)
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarratorConfig::load()?;
            println!("Configuration file: {:?}", NarratorConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("chat_model = \"{}\"", config.chat_model);
            println!("speech_model = \"{}\"", config.speech_model);
            println!("cleanup_rate_per_1k_tokens = {}", config.cleanup_rate_per_1k_tokens);
            println!("synthesis_rate_per_1k_chars = {}", config.synthesis_rate_per_1k_chars);
            println!("tts_chunk_size = {}", config.tts_chunk_size);
            println!("cleanup_chunk_size = {}", config.cleanup_chunk_size);
            println!("test_chunk_size = {}", config.test_chunk_size);
            println!("max_retry_attempts = {}", config.max_retry_attempts);
            println!("retry_delay_seconds = {}", config.retry_delay_seconds);
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = NarratorConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", voice);
        }
    }
    Ok(())
}
