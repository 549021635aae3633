//! Window Alarm CLI
//!
//! Watches for a target application window and sounds an alarm while it
//! is open and the user stays inactive.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use window_alarm::alarm::{self, SystemSink};
use window_alarm::core::{AlertController, Monitor, WindowFilter, WindowTracker};
use window_alarm::source::{SystemSource, WindowSource};
use window_alarm::{Config, VERSION};

#[derive(Parser)]
#[command(name = "window-alarm")]
#[command(version = VERSION)]
#[command(about = "Sounds an alarm while a watched window is open and ignored", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start monitoring in the foreground (Ctrl+C to stop)
    Run {
        /// Override the poll interval in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Override the watched process name
        #[arg(long)]
        process: Option<String>,
    },

    /// Enumerate windows once and list the ones matching the filter
    Check {
        /// List every visible window instead of only matches
        #[arg(long)]
        all: bool,
    },

    /// Sound the alarm briefly, then cancel it
    TestAlarm {
        /// How long to let it play before cancelling
        #[arg(long, default_value = "5")]
        seconds: u64,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { poll_ms, process } => cmd_run(poll_ms, process).await,
        Commands::Check { all } => cmd_check(all),
        Commands::TestAlarm { seconds } => cmd_test_alarm(seconds).await,
        Commands::Config => cmd_config(),
    }
}

/// Load the config file or exit; a malformed file must never be silently
/// replaced by defaults that are not actually in effect.
fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load configuration");
            std::process::exit(1);
        }
    }
}

async fn cmd_run(poll_ms: Option<u64>, process: Option<String>) {
    let mut config = load_config();

    if let Some(ms) = poll_ms {
        config.poll_interval = Duration::from_millis(ms);
    }
    if let Some(name) = process {
        config.filter.process_name = Some(name);
    }

    info!(version = VERSION, "window-alarm starting");
    info!(
        process = config.filter.process_name.as_deref().unwrap_or("<any>"),
        min_width = config.filter.min_width,
        min_height = config.filter.min_height,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "watching for matching windows"
    );

    let tracker = WindowTracker::new(SystemSource::new(), config.filter.clone());
    let controller = AlertController::new(config.policy.clone(), Arc::new(SystemSink::new()));
    let mut monitor = Monitor::new(tracker, controller, config.poll_interval);

    // One root token for the whole pipeline; Ctrl+C cancels it and every
    // task below unwinds before the process exits.
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal_token.cancel();
        }
    });

    monitor.run(shutdown).await;
}

fn cmd_check(all: bool) {
    let config = load_config();
    let filter = if all {
        WindowFilter::any()
    } else {
        config.filter
    };

    let source = SystemSource::new();
    let windows = match source.visible_windows() {
        Ok(windows) => windows,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let matching: Vec<_> = windows.iter().filter(|w| filter.matches(w)).collect();

    println!("{} visible window(s), {} matching", windows.len(), matching.len());
    for window in matching {
        println!(
            "  {} {:40} process={} size={} pos={} class={} fg={}",
            window.handle,
            window.title,
            window.process_name,
            window.size_display(),
            window.position_display(),
            window.class_name,
            window.is_foreground,
        );
    }

    match source.idle_duration() {
        Ok(idle) => println!("Idle for {} ms", idle.as_millis()),
        Err(e) => println!("Idle timer: {e}"),
    }
}

async fn cmd_test_alarm(seconds: u64) {
    println!("Playing alarm for {seconds}s...");

    let sink: Arc<dyn alarm::ToneSink> = Arc::new(SystemSink::new());
    let token = CancellationToken::new();
    let playback = tokio::spawn(alarm::play(sink, alarm::siren_songs(), token.clone()));

    tokio::time::sleep(Duration::from_secs(seconds)).await;
    token.cancel();

    match playback.await {
        Ok(alarm::Playback::Cancelled) => println!("Alarm stopped cleanly."),
        Err(e) => eprintln!("Alarm task failed: {e}"),
    }
}

fn cmd_config() {
    let config = load_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
