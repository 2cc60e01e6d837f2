mod app;
mod cache;
mod config;
mod display;
mod event;
mod feed;
mod logging;
mod producer;
mod sync;
#[cfg(test)]
mod test_support;
mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use display::{RecordingCanvas, TerminalCanvas};
use event::EventHandler;
use logging::LogTarget;

#[derive(Parser, Debug)]
#[command(name = "workboard")]
#[command(about = "Work dashboard for e-paper displays")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/workboard/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Refresh once and render the dashboard
  Show {
    #[arg(short, long, value_enum, default_value_t = Output::Terminal)]
    output: Output,
  },
  /// Refresh and render on a fixed interval
  Watch {
    #[arg(short, long, value_enum, default_value_t = Output::Terminal)]
    output: Output,

    /// Minutes between refreshes (default: display.refresh_interval_mins)
    #[arg(short, long)]
    interval: Option<u64>,
  },
  /// Collect issues from GitHub and publish the dashboard document
  Publish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
  /// Preview the panel in this terminal
  Terminal,
  /// Print each frame's text to stdout
  Log,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let log_target = match &args.command {
    Command::Show {
      output: Output::Terminal,
    }
    | Command::Watch {
      output: Output::Terminal,
      ..
    } => LogTarget::File,
    _ => LogTarget::Stderr,
  };
  let _guard = logging::init(log_target)?;

  let config = config::Config::load(args.config.as_deref())?;

  match args.command {
    Command::Show { output } => match output {
      Output::Terminal => terminal_app(&config)?.show().await,
      Output::Log => log_app(&config)?.show().await,
    },
    Command::Watch { output, interval } => {
      let minutes = interval.unwrap_or(config.display.refresh_interval_mins);
      let interval = interval_from_minutes(minutes)?;

      match output {
        Output::Terminal => terminal_app(&config)?.watch(interval).await,
        Output::Log => log_app(&config)?.watch(interval).await,
      }
    }
    Command::Publish => publish(&config).await,
  }
}

/// Refresh interval from a minute count; zero and overflowing values are rejected.
fn interval_from_minutes(minutes: u64) -> Result<Duration> {
  if minutes == 0 {
    return Err(eyre!("Refresh interval must be at least one minute"));
  }
  minutes
    .checked_mul(60)
    .map(Duration::from_secs)
    .ok_or_else(|| eyre!("Refresh interval of {} minutes is too large", minutes))
}

fn terminal_app(config: &config::Config) -> Result<App<TerminalCanvas>> {
  let canvas = TerminalCanvas::new(config.display.width, config.display.height)?;
  let events = EventHandler::new(Duration::from_millis(250));
  App::new(config, canvas, Some(events))
}

fn log_app(config: &config::Config) -> Result<App<RecordingCanvas>> {
  let canvas = RecordingCanvas::with_echo(Box::new(std::io::stdout()));
  App::new(config, canvas, None)
}

async fn publish(config: &config::Config) -> Result<()> {
  let producer = config
    .producer
    .clone()
    .ok_or_else(|| eyre!("No producer section in the configuration file"))?;

  let publisher = producer::Publisher::new(
    producer,
    config::Config::get_github_token()?,
    config::Config::get_source_credential(),
    Duration::from_secs(config.source.timeout_secs),
  )?;

  let report = publisher.run().await?;
  println!(
    "Published {} issues ({}){}",
    report.issue_count,
    &report.fingerprint[..12],
    if report.uploaded { ", uploaded" } else { "" }
  );

  Ok(())
}
