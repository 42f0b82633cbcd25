//! cefcat — parse CEF log lines from a file or stdin and print them as JSON.
//!
//! Each input line is parsed independently; lines that fail header
//! validation are logged and skipped so one bad record never stops the
//! stream. An optional deadline cancels parsing of any remaining lines.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cef_parser::{CefEvent, ParseError};

#[derive(Parser, Debug)]
#[command(name = "cefcat")]
#[command(about = "Parse CEF log lines into JSON")]
struct Args {
    /// Input file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Print only this extension field for each event
    #[arg(long)]
    field: Option<String>,

    /// Print the field names of each event's schema instead of values
    #[arg(long)]
    names: bool,

    /// Stop parsing after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

/// Initialise the tracing / logging subsystem.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cefcat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cancel = CancellationToken::new();
    if let Some(ms) = args.timeout_ms {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            warn!("deadline reached after {}ms, cancelling", ms);
            deadline.cancel();
        });
    }

    match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            run(BufReader::new(file), &args, &cancel).await
        }
        None => run(BufReader::new(tokio::io::stdin()), &args, &cancel).await,
    }
}

async fn run<R>(reader: BufReader<R>, args: &Args, cancel: &CancellationToken) -> Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    let mut parsed = 0usize;
    let mut skipped = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match CefEvent::parse_with_cancel(&line, cancel) {
            Ok(event) => event,
            Err(ParseError::Cancelled) => {
                warn!("cancelled with {} lines parsed, {} skipped", parsed, skipped);
                break;
            }
            Err(err) => {
                warn!("skipping line: {}", err);
                skipped += 1;
                continue;
            }
        };
        parsed += 1;
        print_event(&event, args)?;
    }

    info!("done: {} parsed, {} skipped", parsed, skipped);
    Ok(())
}

fn print_event(event: &CefEvent, args: &Args) -> Result<()> {
    if args.names {
        println!("{}", event.field_names().join(" "));
        return Ok(());
    }
    if let Some(name) = &args.field {
        match event.get_field(name) {
            Ok(value) => println!("{}", serde_json::to_string(&value)?),
            Err(err) => warn!("{}", err),
        }
        return Ok(());
    }
    println!("{}", event.as_json());
    Ok(())
}
