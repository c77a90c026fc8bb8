use clap::{Args, Parser, Subcommand};
use doc_summarizer::acquisition::dialog_selection;
use doc_summarizer::console::{render_summary, ConsolePresenter, TracingNotifier};
use doc_summarizer::validation::{accept_filter, validate_document};
use doc_summarizer::{
    DocumentWorkflowController, SelectionOutcome, SimulatedStorageBackend, SimulatedSummaryBackend,
    SummaryLength, WorkflowConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "doc-summarizer", version, about = "Upload a document and get an AI summary with key points")]
struct Cli {
    /// Read DOC_SUMMARIZER_* settings from this dotenv file; the process
    /// environment still wins
    #[arg(long, global = true, value_name = "FILE")]
    config_env: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a document and print its summary
    Summarize(SummarizeArgs),
    /// Only check whether a file would be accepted
    Check {
        file: PathBuf,
    },
}

#[derive(Args)]
struct SummarizeArgs {
    /// PDF, JPEG or PNG file
    file: PathBuf,

    #[arg(long, default_value = "short")]
    length: SummaryLength,

    /// Use the built-in simulated storage and AI instead of the HTTP endpoints
    #[arg(long)]
    simulate: bool,

    #[arg(long, default_value_t = 2000)]
    simulate_delay_ms: u64,

    /// Send the selected length to the AI endpoint as part of the prompt
    #[arg(long)]
    thread_length: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summarize(args) => summarize(args, cli.config_env).await,
        Command::Check { file } => check(file).await,
    }
}

async fn summarize(args: SummarizeArgs, config_env: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let mut config = match config_env {
        Some(path) => WorkflowConfig::from_env_file(path)?,
        None => WorkflowConfig::from_env()?,
    };
    if args.thread_length {
        config.thread_summary_length = true;
    }
    info!("Starting Doc Summarizer with {:?}", config);

    let mut builder = DocumentWorkflowController::builder()
        .config(config)
        .notifier(Arc::new(TracingNotifier))
        .presenter(Arc::new(ConsolePresenter))
        .summary_length(args.length);

    if args.simulate {
        builder = builder
            .storage(Arc::new(SimulatedStorageBackend::new().with_delay(args.simulate_delay_ms)))
            .summarizer(Arc::new(SimulatedSummaryBackend::new().with_delay(args.simulate_delay_ms)));
    }

    let controller = builder.build()?;
    let selection = dialog_selection(Some(args.file.as_path())).await?;

    match controller.handle_selection(selection).await {
        SelectionOutcome::Completed(report) => {
            if args.json {
                println!("{}", report.to_json()?);
            } else if let Some(summary) = report.state.summary() {
                print!("{}", render_summary(summary));
            }

            if report.succeeded() {
                Ok(ExitCode::SUCCESS)
            } else {
                error!("No summary produced for {}", report.file_name);
                Ok(ExitCode::FAILURE)
            }
        }
        SelectionOutcome::Rejected { mime_type } => {
            error!("{} is not supported (accepted: {})", mime_type, accept_filter());
            Ok(ExitCode::FAILURE)
        }
        SelectionOutcome::NoFile | SelectionOutcome::Busy => Ok(ExitCode::FAILURE),
    }
}

async fn check(file: PathBuf) -> anyhow::Result<ExitCode> {
    let selection = dialog_selection(Some(file.as_path())).await?;
    let Some(document) = selection.first() else {
        return Ok(ExitCode::FAILURE);
    };

    match validate_document(&document) {
        Ok(()) => {
            println!("{}: ok ({}, {} bytes)", document.name, document.mime_type, document.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}: {} (accepted: {})", document.name, e, accept_filter());
            Ok(ExitCode::FAILURE)
        }
    }
}
