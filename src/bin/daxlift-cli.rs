//! Daxlift CLI - Command-line front end for the converter workbench
//!
//! Drives the same orchestration the interactive UI uses and prints the
//! resulting presentation state.

use anyhow::Context;
use clap::{Parser, Subcommand};
use daxlift::workbench::objects::{ObjectCategory, ObjectEntry};
use daxlift::workbench::presenter::{MessageKind, PresentationState, StatusMessage};
use daxlift::workbench::request::ConversionMode;
use daxlift::workbench::state::Workbench;
use daxlift::{ConverterSession, WorkbenchConfig};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "daxlift")]
#[command(about = "Convert SQL and Spotfire expressions to DAX", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Conversion service base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Source grammar (sql or spotfire)
    #[arg(short, long)]
    mode: Option<ConversionMode>,

    /// Transport timeout for service calls, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert source code to DAX
    Convert {
        /// Source file (stdin when omitted)
        file: Option<PathBuf>,

        /// Copy the converted code to the system clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Validate source code without converting
    Validate {
        /// Source file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Read source lines from stdin, validating in the background as they arrive
    Watch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let session = ConverterSession::connect(config)?;

    let failed = match cli.command {
        Commands::Convert { file, copy } => {
            session.orchestrator().set_source(read_source(file.as_deref())?);
            session.convert().await;
            if copy {
                session.copy().await;
            }
            let state = session.snapshot();
            print_output(&state);
            print_objects(&state);
            print_messages(&state);
            has_error(&state)
        }

        Commands::Validate { file } => {
            session.orchestrator().set_source(read_source(file.as_deref())?);
            session.validate().await;
            let state = session.snapshot();
            print_messages(&state);
            has_error(&state)
        }

        Commands::Watch => watch(&session).await?,
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<WorkbenchConfig> {
    let mut config = match &cli.config {
        Some(path) => WorkbenchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => WorkbenchConfig::default(),
    };
    config = config.apply_env()?;

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    Ok(config)
}

fn read_source(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

async fn watch(session: &ConverterSession) -> anyhow::Result<bool> {
    eprintln!("{}", session.snapshot().placeholder());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let mut buffer = String::new();
    let mut last_shown = PresentationState::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        buffer.push_str(&line);
                        buffer.push('\n');
                        session.edit_source(buffer.clone());
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                let state = session.snapshot();
                if *state.messages.state() != last_shown {
                    last_shown = state.messages.state().clone();
                    print_messages(&state);
                }
            }
        }
    }

    // Input is closed: validate what was read instead of waiting out the timer.
    session.debouncer().cancel();
    session.orchestrator().request_validate(true).await;
    let state = session.snapshot();
    if *state.messages.state() != last_shown {
        print_messages(&state);
    }
    Ok(has_error(&state))
}

fn has_error(state: &Workbench) -> bool {
    let messages = state.messages.state();
    matches!(messages.status, StatusMessage::Error { .. }) || !messages.error_entries.is_empty()
}

fn print_output(state: &Workbench) {
    match &state.converted_code {
        Some(code) => {
            println!("{code}");
            println!();
        }
        None => eprintln!("(no DAX output)"),
    }
}

fn print_objects(state: &Workbench) {
    for category in ObjectCategory::ALL {
        let entries: Vec<String> = state
            .objects
            .entries(category)
            .iter()
            .map(|entry| match entry {
                ObjectEntry::Item(text) => text.clone(),
                ObjectEntry::Placeholder(text) => format!("({text})"),
            })
            .collect();
        eprintln!("{:>10}: {}", category.plural(), entries.join(", "));
    }
}

fn print_messages(state: &Workbench) {
    if state.messages.state().placeholder_visible() {
        eprintln!("No messages");
        return;
    }
    for block in state.messages.render() {
        let tag = match block.kind {
            MessageKind::Success => "ok",
            MessageKind::Warning => "warn",
            MessageKind::Note => "note",
            MessageKind::Error => "error",
        };
        eprintln!("[{tag}] {}", block.heading);
        for item in block.items {
            eprintln!("    - {item}");
        }
    }
}
