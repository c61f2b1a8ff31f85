use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use futures::{SinkExt, StreamExt};
use shared::protocol::{CommandFrame, OperatorCommand, RobotMessage};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

mod sim;

use sim::SimRobot;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve simulated telemetry on ws://<bind>/ws
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,
    },
    /// Print the frames of the first ticks as JSON lines
    Sample {
        #[arg(long, default_value_t = 5)]
        ticks: u64,
    },
}

#[derive(Clone)]
struct AppState {
    robot: Arc<Mutex<SimRobot>>,
    events: broadcast::Sender<RobotMessage>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, tick_ms } => serve(&bind, Duration::from_millis(tick_ms.max(1))).await?,
        Command::Sample { ticks } => {
            let mut robot = SimRobot::default();
            for _ in 0..ticks {
                for frame in robot.step() {
                    println!("{}", serde_json::to_string(&frame)?);
                }
            }
        }
    }

    Ok(())
}

async fn serve(bind: &str, tick: Duration) -> Result<()> {
    let (events, _) = broadcast::channel(256);
    let state = AppState {
        robot: Arc::new(Mutex::new(SimRobot::default())),
        events,
    };

    let ticker = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let frames = ticker.robot.lock().await.step();
            for frame in frames {
                // No receivers just means no dashboard is connected.
                let _ = ticker.events.send(frame);
            }
        }
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state);

    let addr: SocketAddr = bind.parse()?;
    info!(%addr, "robot simulator listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: AppState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.events.subscribe();
    info!("dashboard connected");

    let send_task = tokio::spawn(async move {
        loop {
            let frame = match events_rx.recv().await {
                Ok(frame) => frame,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "dashboard lagging, frames skipped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&frame) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let command = serde_json::from_str::<CommandFrame>(&text)
            .map_err(|err| err.to_string())
            .and_then(|frame| OperatorCommand::try_from(frame).map_err(|err| err.to_string()));
        match command {
            Ok(command) => {
                info!(?command, "command received");
                state.robot.lock().await.apply(command);
            }
            Err(error) => warn!(%error, raw = %text, "rejected command frame"),
        }
    }

    send_task.abort();
    info!("dashboard disconnected");
}
