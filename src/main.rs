use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use keycalc::calculator::copy_to_clipboard;
use keycalc::config::Config;
use keycalc::display::RecordingSink;
use keycalc::editor::{Command, EditBuffer, ExpressionState};
use keycalc::input::{CommandQueue, parse_keys};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

type Buffer = EditBuffer<RecordingSink, RecordingSink>;

/// A keystroke-driven four-function calculator.
///
/// Keys are digits, `.`, `+ - * /` (also `x`, `×`, `÷`), `=` to evaluate,
/// and the named keys `<bs>` (delete last) and `<esc>` (reset). In
/// interactive mode each input line is a run of keys and an empty line
/// evaluates.
#[derive(Parser, Debug)]
#[command(name = "keycalc", version)]
struct Cli {
    /// Keys to type, e.g. `12+3*4=`. Starts interactive mode when omitted.
    keys: Option<String>,

    /// Print the state as JSON instead of two text lines.
    #[arg(long)]
    json: bool,

    /// Copy the result to the clipboard (one-shot mode only).
    #[arg(long)]
    copy: bool,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every applied command.
    #[arg(short, long)]
    verbose: bool,
}

/// What the two displays currently show, plus the underlying state.
#[derive(Serialize)]
struct Snapshot<'a> {
    expression: &'a str,
    result: &'a str,
    #[serde(flatten)]
    state: &'a ExpressionState,
}

impl<'a> Snapshot<'a> {
    fn of(buffer: &'a Buffer) -> Self {
        Self {
            expression: buffer.expression_sink().current(),
            result: buffer.result_sink().current(),
            state: buffer.state(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_required(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    init_logging(&config, cli.verbose);
    tracing::info!(settings = ?config.edit_settings(), "starting");

    let buffer = EditBuffer::with_settings(
        config.edit_settings(),
        RecordingSink::new(),
        RecordingSink::new(),
    );

    match cli.keys.as_deref() {
        Some(keys) => run_once(&cli, buffer, keys),
        None => run_interactive(&cli, buffer),
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let default_filter = if verbose { "debug" } else { config.log_level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_once(cli: &Cli, mut buffer: Buffer, keys: &str) -> Result<()> {
    let commands = parse_keys(keys).with_context(|| format!("Invalid keys: {keys:?}"))?;
    for command in commands {
        buffer.apply(command);
    }

    render(cli.json, &buffer, &mut io::stdout().lock())?;

    if cli.copy {
        let result = buffer.result_sink().current();
        if let Err(err) = copy_to_clipboard(result) {
            tracing::warn!(error = %err, "could not copy result");
        }
    }

    Ok(())
}

fn run_interactive(cli: &Cli, mut buffer: Buffer) -> Result<()> {
    let queue = CommandQueue::new();
    let sender = queue.sender();

    let reader = thread::spawn(move || -> Result<()> {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;

            let commands = match parse_keys(&line) {
                Ok(commands) if commands.is_empty() && line.trim().is_empty() => {
                    vec![Command::Evaluate]
                }
                Ok(commands) => commands,
                Err(err) => {
                    eprintln!("keycalc: {err}");
                    continue;
                }
            };

            if sender.send_batch(commands).is_err() {
                break;
            }
        }
        Ok(())
    });

    let stdout = io::stdout();
    render(cli.json, &buffer, &mut stdout.lock())?;

    let mut render_error = None;
    queue.run(&mut buffer, |buffer| match render(cli.json, buffer, &mut stdout.lock()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(err) => {
            render_error = Some(err);
            ControlFlow::Break(())
        }
    });

    // The reader may still be blocked on stdin; it stops on its next send.
    if let Some(err) = render_error {
        return Err(err.context("Failed to write output"));
    }

    reader
        .join()
        .map_err(|_| anyhow!("Input thread panicked"))?
}

fn render(json: bool, buffer: &Buffer, out: &mut impl Write) -> Result<()> {
    let snapshot = Snapshot::of(buffer);

    if json {
        serde_json::to_writer(&mut *out, &snapshot)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", snapshot.expression)?;
        if !snapshot.result.is_empty() {
            writeln!(out, "= {}", snapshot.result)?;
        }
    }

    out.flush()?;
    Ok(())
}
