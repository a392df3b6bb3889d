use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use solicit_screen::{
    build_screening_prompt, read_transcript, render, segment, Notice, OpenAiClient, OpenAiConfig,
    RenderConfig, SegmentStats, Session, SubmitOutcome, TextReport,
};

#[derive(Parser)]
#[command(name = "solicit-screen")]
#[command(author, version, about = "Unfair-solicitation screening of consultation transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a transcript for Article 21 unfair-solicitation concerns
    Screen {
        /// Input transcript file (one utterance per line, `-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the machine-readable report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the two-pane HTML report
        #[arg(long)]
        html: Option<PathBuf>,

        /// Model to use (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Utterance to focus in the HTML report (e.g. u3)
        #[arg(long)]
        focus: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Segment a transcript without calling the model
    Segment {
        /// Input transcript file (one utterance per line, `-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Also print the prompt that would be sent
        #[arg(long)]
        prompt: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Screen {
            input,
            output,
            html,
            model,
            focus,
            verbose,
        } => {
            setup_logging(verbose);
            screen_transcript(input, output, html, model, focus).await
        }
        Commands::Segment {
            input,
            prompt,
            verbose,
        } => {
            setup_logging(verbose);
            segment_transcript(input, prompt)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn screen_transcript(
    input: PathBuf,
    output: Option<PathBuf>,
    html: Option<PathBuf>,
    model: Option<String>,
    focus: Option<String>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let raw = read_transcript(&input).context("Failed to load input transcript")?;

    // Empty scripts are reported without needing credentials
    if segment(&raw).is_empty() {
        warn!("No utterances to analyze in {:?}", input);
        return Ok(());
    }

    let mut config = OpenAiConfig::from_env()?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let client = OpenAiClient::new(config);

    let mut session = Session::new();
    let outcome = session.submit(&raw, &client).await;
    if outcome == SubmitOutcome::Failed {
        let message = session.notice.as_ref().map(Notice::message).unwrap_or("unknown error");
        anyhow::bail!("Screening failed: {}", message);
    }

    if let Some(id) = focus {
        if !session.focus(&id) {
            warn!("Unknown utterance {}; no focus applied", id);
        }
    }

    print!("{}", TextReport::new(&session).format());

    let result = render(
        &session,
        output.as_deref(),
        html.as_deref(),
        &RenderConfig::default(),
    )?;
    if let Some(path) = result.json_path {
        info!("JSON report written to {:?}", path);
    }
    if let Some(path) = result.html_path {
        info!("HTML report written to {:?}", path);
    }

    Ok(())
}

fn segment_transcript(input: PathBuf, show_prompt: bool) -> Result<()> {
    info!("Segmenting transcript from {:?}", input);
    let raw = read_transcript(&input).context("Failed to load input transcript")?;
    let utterances = segment(&raw);
    let stats = SegmentStats::from_utterances(&utterances);

    println!("Transcript Segmentation");
    println!("=======================");
    println!("Utterances: {}", stats.utterances);
    println!("With timestamp: {}", stats.timestamped);
    println!();

    for u in &utterances {
        println!(
            "{:>5}  {:>4}  {:>8}  {}",
            u.id,
            u.line_no,
            u.time.as_deref().unwrap_or("-"),
            u.text
        );
    }

    if show_prompt && !utterances.is_empty() {
        println!();
        println!("Prompt");
        println!("------");
        println!("{}", build_screening_prompt(&utterances));
    }

    Ok(())
}
