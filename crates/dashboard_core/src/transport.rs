use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::{net::TcpStream, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    dispatcher::{CommandDispatcher, CommandSink},
    error::{DashboardError, Result},
    queue::DispatchHandle,
    slices::ConnectionAction,
    watcher::{watch_feed, WatchSummary},
};

pub type RobotStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type RobotFeed = SplitStream<RobotStream>;

const PING_PAYLOAD_LEN: usize = 8;

pub fn parse_robot_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| DashboardError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(DashboardError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{other}`, expected ws:// or wss://"),
        }),
    }
}

pub struct WsCommandSink {
    writer: Mutex<SplitSink<RobotStream, Message>>,
}

impl WsCommandSink {
    pub async fn ping(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.send(Message::Ping(ping_payload())).await?;
        Ok(())
    }
}

#[async_trait]
impl CommandSink for WsCommandSink {
    async fn send_text(&self, text: String) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.send(Message::Text(text)).await?;
        Ok(())
    }
}

pub async fn connect(url: &Url) -> Result<(Arc<WsCommandSink>, RobotFeed)> {
    let (stream, _) = connect_async(url.as_str())
        .await
        .map_err(|source| DashboardError::Connect {
            url: url.to_string(),
            source,
        })?;
    let (writer, reader) = stream.split();
    info!(%url, "connected to robot");
    Ok((
        Arc::new(WsCommandSink {
            writer: Mutex::new(writer),
        }),
        reader,
    ))
}

/// Ping payload: send time as big-endian milliseconds since the unix epoch.
pub fn ping_payload() -> Vec<u8> {
    now_ms().to_be_bytes().to_vec()
}

pub fn ping_latency_ms(payload: &[u8]) -> Option<u64> {
    let bytes: [u8; PING_PAYLOAD_LEN] = payload.try_into().ok()?;
    let sent = u64::from_be_bytes(bytes);
    now_ms().checked_sub(sent)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

pub fn spawn_ping_loop(sink: Arc<WsCommandSink>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(error) = sink.ping().await {
                debug!(%error, "ping loop stopped");
                break;
            }
        }
    })
}

/// A connected session: feed watcher and ping loop running, dispatcher ready.
pub struct LiveSession {
    pub dispatcher: CommandDispatcher,
    pub watcher: JoinHandle<Result<WatchSummary>>,
    ping: Option<JoinHandle<()>>,
}

impl LiveSession {
    pub async fn start(
        url: &Url,
        dispatch: DispatchHandle,
        ping_interval: Option<Duration>,
    ) -> Result<Self> {
        let (sink, feed) = connect(url).await?;
        // Reduced before returning, so a `send` right after `start` sees the link as up.
        dispatch.apply(ConnectionAction::Connected).await?;
        let watcher = tokio::spawn(watch_feed(feed, dispatch.clone()));
        let ping = ping_interval
            .filter(|every| !every.is_zero())
            .map(|every| spawn_ping_loop(Arc::clone(&sink), every));
        Ok(Self {
            dispatcher: CommandDispatcher::new(dispatch, sink),
            watcher,
            ping,
        })
    }

    /// Waits for the robot to close the feed.
    pub async fn finished(mut self) -> Result<WatchSummary> {
        let outcome = (&mut self.watcher).await;
        if let Some(ping) = self.ping.take() {
            ping.abort();
        }
        outcome.map_err(|error| {
            warn!(%error, "feed watcher task failed");
            DashboardError::WatcherTask(error)
        })?
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.watcher.abort();
        if let Some(ping) = self.ping.take() {
            ping.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
