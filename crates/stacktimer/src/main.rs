mod emitter;
mod press;
mod ticker;
mod widget;

use anyhow::{Context, Result};
use clap::Parser;
use emitter::Emitter;
use stacktimer_core::config::Config;
use stacktimer_core::emoji;
use stacktimer_core::limits::Variant;
use stacktimer_core::protocol::{self, Command, Event};
use std::path::PathBuf;
use ticker::{Scheduler, TokioScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use widget::{Action, TimerWidget};

#[derive(Parser)]
#[command(
    name = "stacktimer",
    about = "Stack timer widget driven by JSON-lines commands on stdin"
)]
struct Cli {
    /// Config file (default: ~/.config/stacktimer/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Product variant: classic or stack
    #[arg(long)]
    variant: Option<Variant>,
    /// Countdown tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

/// A line read from stdin.
enum Input {
    Command(Command),
    Invalid(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stacktimer=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("loading config")?,
    };
    if let Some(variant) = cli.variant {
        config.general.variant = variant;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.general.tick_ms = tick_ms.max(1);
    }
    info!(
        variant = ?config.general.variant,
        tick_ms = config.general.tick_ms,
        "stacktimer starting"
    );

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut widget = TimerWidget::new(&config, TokioScheduler::new(tick_tx));
    info!(
        task = ?widget.task().map(|t| t.headline()),
        remaining = widget.remaining_secs(),
        "widget mounted"
    );

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_input(input_tx));

    let mut out = Emitter::new(std::io::stdout());
    out.state(widget.snapshot(), true)?;

    loop {
        // Only a held delete press needs a deadline
        let deadline = widget.next_deadline();
        let sleep_fut = match deadline {
            Some(dl) => tokio::time::sleep_until(tokio::time::Instant::from_std(dl)),
            None => tokio::time::sleep_until(
                tokio::time::Instant::now() + std::time::Duration::from_secs(86400),
            ),
        };
        let has_deadline = deadline.is_some();

        tokio::select! {
            input = input_rx.recv() => {
                match input {
                    Some(Input::Command(Command::Quit)) | None => break,
                    Some(Input::Command(cmd)) => {
                        let force = matches!(cmd, Command::Status);
                        let actions = dispatch(&mut widget, cmd, &mut out)?;
                        out.actions(actions)?;
                        out.state(widget.snapshot(), force)?;
                    }
                    Some(Input::Invalid(message)) => out.ack(false, message)?,
                }
            }
            Some(id) = tick_rx.recv() => {
                let actions = widget.tick(id);
                out.actions(actions)?;
                out.state(widget.snapshot(), false)?;
            }
            _ = sleep_fut, if has_deadline => {
                let actions = widget.check_hold();
                out.actions(actions)?;
                out.state(widget.snapshot(), false)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    info!(
        mode = ?widget.mode(),
        paused = widget.is_paused(),
        ticking = ?widget.active_tick(),
        break_remaining = widget.break_remaining_secs(),
        "stacktimer shutting down"
    );
    drop(widget);
    Ok(())
}

fn dispatch<S: Scheduler, W: std::io::Write>(
    widget: &mut TimerWidget<S>,
    cmd: Command,
    out: &mut Emitter<W>,
) -> Result<Vec<Action>> {
    debug!(?cmd, "command");
    let actions = match cmd {
        Command::Start => widget.start(),
        Command::Pause => widget.pause(),
        Command::Resume => widget.resume(),
        Command::FinishEarly => widget.finish_early(),
        Command::CancelTimer => widget.cancel_timer(),
        Command::OpenEdit => widget.open_edit(),
        Command::SetName { name } => widget.on_name_change(name),
        Command::SetEmoji { emoji } => widget.on_emoji_change(emoji),
        Command::SetColor { color } => widget.on_color_change(color),
        Command::SetDuration { minutes } => widget.on_duration_change(minutes),
        Command::AdjustDuration { direction } => widget.adjust_duration(direction),
        Command::ConfirmEdit => widget.confirm_edit(),
        Command::CancelEdit => widget.cancel_edit(),
        Command::RequestDelete => widget.request_delete(),
        Command::PressDelete => widget.press_delete(),
        Command::ReleaseDelete => widget.release_delete(),
        Command::ConfirmDelete { gesture } => widget.confirm_delete(gesture),
        Command::CancelDelete => widget.cancel_delete(),
        Command::AdjustBreak { direction } => widget.adjust_break(direction),
        Command::ConfirmBreak { minutes } => widget.confirm_break(minutes),
        Command::CancelBreak => widget.cancel_break(),
        Command::AddTask => widget.add_task(),
        Command::Background => widget.background(),
        Command::Foreground => widget.foreground(),
        Command::Status => Vec::new(),
        Command::Emojis { query, category } => {
            let emojis = emoji::filter_emojis(&query, category)
                .into_iter()
                .map(str::to_string)
                .collect();
            out.send(&Event::Emojis { category, emojis })?;
            Vec::new()
        }
        // handled by the event loop
        Command::Quit => Vec::new(),
    };
    Ok(actions)
}

async fn read_input(tx: mpsc::UnboundedSender<Input>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read error");
                break;
            }
        };
        let input = match protocol::decode_command(&line) {
            None => continue,
            Some(Ok(cmd)) => Input::Command(cmd),
            Some(Err(e)) => {
                warn!(error = %e, "invalid command");
                Input::Invalid(format!("invalid command: {}", e))
            }
        };
        if tx.send(input).is_err() {
            break;
        }
    }
    debug!("stdin closed");
}
