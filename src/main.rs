use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use ytsum::config::{Config, ModelSize};
use ytsum::feedback::{send_feedback, DEFAULT_FEEDBACK_URL};
use ytsum::pipeline::{write_artifacts, EngineRegistry, Orchestrator};

#[derive(Parser)]
#[command(name = "ytsum")]
#[command(version, about = "Summarize YouTube videos from the command line")]
#[command(
    long_about = "Download a video's audio, transcribe it with Whisper, and condense the transcript with BART."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a YouTube video
    Summarize {
        /// YouTube video URL
        url: String,

        /// Whisper model size: tiny, base, medium, large
        #[arg(short, long)]
        model_size: Option<ModelSize>,

        /// Maximum transcript chunk size in characters
        #[arg(short, long)]
        chunk_size: Option<usize>,

        /// Directory for transcript.txt and summary.txt
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Send feedback to the maintainers
    Feedback {
        /// Feedback message
        #[arg(short, long)]
        message: String,

        /// Your name (optional)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Your email (optional)
        #[arg(short, long, default_value = "")]
        email: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn format_duration(seconds: u64) -> String {
    let (mins, secs) = (seconds / 60, seconds % 60);
    let (hrs, mins) = (mins / 60, mins % 60);
    if hrs > 0 {
        format!("{hrs}h {mins}m {secs}s")
    } else {
        format!("{mins}m {secs}s")
    }
}

async fn run_summarize(
    url: String,
    model_size: Option<ModelSize>,
    chunk_size: Option<usize>,
    output_dir: PathBuf,
    no_progress: bool,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(size) = model_size {
        config.model_size = size;
    }
    if let Some(size) = chunk_size {
        config.max_chunk_size = size;
    }
    config.validate().context("Configuration validation failed")?;

    info!("URL:        {url}");
    info!("Model size: {}", config.model_size);

    let engines = EngineRegistry::from_config(&config);
    let mut orchestrator =
        Orchestrator::new(engines).with_max_chunk_size(config.max_chunk_size);

    let progress_bar = if no_progress {
        None
    } else {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    if let Some(pb) = progress_bar.clone() {
        orchestrator = orchestrator.on_progress(move |p| {
            pb.set_position(p.percent as u64);
            pb.set_message(p.label);
        });
    }

    let run = orchestrator.run(&url).await?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Done!");
    }

    if let Some(ref meta) = run.metadata {
        println!();
        println!("{}", style(&meta.title).bold());
        if meta.duration_secs > 0 {
            println!("Duration: {}", format_duration(meta.duration_secs));
        }
    }
    if run.from_cache {
        println!("{}", style("(served from cache)").dim());
    }

    println!();
    println!("{}", style("Transcript").bold().underlined());
    println!("{}", run.transcript);
    println!();
    println!("{}", style("Summary").bold().underlined());
    println!("{}", run.summary);

    let (transcript_path, summary_path) = write_artifacts(&run, &output_dir)?;
    println!();
    println!(
        "Saved {} and {}",
        transcript_path.display(),
        summary_path.display()
    );

    Ok(())
}

async fn run_feedback(message: String, name: String, email: String) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let endpoint = config
        .feedback_url
        .unwrap_or_else(|| DEFAULT_FEEDBACK_URL.to_string());

    send_feedback(&endpoint, &name, &email, &message)
        .await
        .context("Failed to send feedback")?;

    println!("Thank you for your feedback!");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Command::Summarize {
            url,
            model_size,
            chunk_size,
            output_dir,
            no_progress,
        } => run_summarize(url, model_size, chunk_size, output_dir, no_progress).await,
        Command::Feedback {
            message,
            name,
            email,
        } => run_feedback(message, name, email).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3600), "1h 0m 0s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }
}
