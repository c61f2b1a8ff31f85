use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_core::{parse_robot_url, spawn_store, LiveSession, Store};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, DEFAULT_CONFIG_FILE};
use console::{execute, parse_line, ConsoleCommand};

#[derive(Parser, Debug)]
#[command(about = "Operator console for the robot telemetry dashboard")]
struct Args {
    /// Robot websocket url, e.g. ws://192.168.43.1:8000/ws
    #[arg(long)]
    robot_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Zero disables pings.
    #[arg(long)]
    ping_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    if let Some(robot_url) = args.robot_url {
        settings.robot_url = robot_url;
    }
    if let Some(ping_interval_ms) = args.ping_interval_ms {
        settings.ping_interval_ms = ping_interval_ms;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let url = parse_robot_url(&settings.robot_url)?;
    let (handle, store_task) = spawn_store(Store::default(), settings.queue_capacity);

    let mut connection_log = WatchStream::new(handle.subscribe())
        .map(|state| (state.socket.is_connected, state.status.enabled));
    tokio::spawn(async move {
        let mut last = None;
        while let Some(current) = connection_log.next().await {
            if last != Some(current) {
                let (connected, enabled) = current;
                info!(connected, enabled, "robot link status");
                last = Some(current);
            }
        }
    });

    let session = LiveSession::start(
        &url,
        handle.clone(),
        Some(Duration::from_millis(settings.ping_interval_ms)),
    )
    .await
    .with_context(|| format!("failed to start session with {url}"))?;
    let dispatcher = session.dispatcher.clone();
    println!("{}", console::HELP);

    let mut finished = Box::pin(session.finished());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            summary = &mut finished => {
                match summary {
                    Ok(summary) => info!(?summary, "robot closed the connection"),
                    Err(error) => warn!(%error, "robot session ended with an error"),
                }
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read console input")? else {
                    break;
                };
                let command = match parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(error) => {
                        println!("{error}");
                        continue;
                    }
                };
                if command == ConsoleCommand::Quit {
                    break;
                }
                match execute(&dispatcher, command).await {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => {}
                    Err(error) => println!("error: {error}"),
                }
            }
        }
    }

    // Dropping the session stops its watcher, which releases the last queue handles.
    drop(finished);
    drop(dispatcher);
    drop(handle);
    if let Ok(store) = tokio::time::timeout(Duration::from_secs(1), store_task).await {
        let store = store.context("store task panicked")?;
        info!(
            path_points = store.snapshot().drivetrain.path_history.len(),
            "dashboard stopped"
        );
    }
    Ok(())
}
