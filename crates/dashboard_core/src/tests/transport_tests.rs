use super::*;
use crate::{
    dispatcher::SendRequest, queue::spawn_store, slices::TelemetryCommandAction, state::Store,
};

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use shared::protocol::OperatorCommand;
use tokio::{net::TcpListener, sync::oneshot};

const ROBOT_FRAMES: &[&str] = &[
    r#"{"type":"status","payload":{"enabled":true,"batteryVoltage":12.7}}"#,
    r#"{"type":"this_is_not_a_message"}"#,
    r#"{"type":"intake","payload":{"rpm":180}}"#,
];

#[derive(Clone)]
struct RobotState {
    received: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

async fn robot_ws(ws: WebSocketUpgrade, State(state): State<RobotState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| robot_session(state, socket))
}

async fn robot_session(state: RobotState, mut socket: WebSocket) {
    for frame in ROBOT_FRAMES {
        if socket.send(WsMessage::Text(frame.to_string())).await.is_err() {
            return;
        }
    }
    while let Some(Ok(message)) = socket.recv().await {
        if let WsMessage::Text(text) = message {
            if let Some(tx) = state.received.lock().await.take() {
                let _ = tx.send(text);
            }
            break;
        }
    }
    let _ = socket.send(WsMessage::Close(None)).await;
}

async fn spawn_fake_robot() -> anyhow::Result<(Url, oneshot::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = RobotState {
        received: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().route("/ws", get(robot_ws)).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("ws://{addr}/ws"))?, rx))
}

#[tokio::test]
async fn live_session_applies_feed_and_sends_staged_command() {
    let (url, received) = spawn_fake_robot().await.expect("fake robot");
    let (handle, _task) = spawn_store(Store::default(), 64);
    let mut snapshots = handle.subscribe();

    let session = LiveSession::start(&url, handle.clone(), None)
        .await
        .expect("connect");

    tokio::time::timeout(Duration::from_secs(5), async {
        while snapshots.borrow_and_update().intake.rpm != 180.0 {
            snapshots.changed().await.expect("store alive");
        }
    })
    .await
    .expect("robot telemetry applied");

    let state = handle.current().await.expect("state");
    assert!(state.socket.is_connected);
    assert!(state.status.enabled);
    assert_eq!(state.status.battery_voltage, 12.7);

    session
        .dispatcher
        .stage(TelemetryCommandAction::SetIntakeMotorRpm(437.0))
        .await
        .expect("stage");
    session
        .dispatcher
        .send(SendRequest::IntakeRpm)
        .await
        .expect("send");

    let frame = tokio::time::timeout(Duration::from_secs(5), received)
        .await
        .expect("robot received a frame")
        .expect("frame");
    let frame: Value = serde_json::from_str(&frame).expect("json frame");
    assert_eq!(
        frame,
        json!({"type": "command", "subsystem": "intake", "command": "setRpm", "value": 437.0})
    );

    let summary = tokio::time::timeout(Duration::from_secs(5), session.finished())
        .await
        .expect("feed closed")
        .expect("watcher summary");
    assert_eq!(summary.messages, 3);
    assert_eq!(summary.dropped, 1);

    let state = handle.current().await.expect("state");
    assert!(!state.socket.is_connected);
}

#[tokio::test]
async fn send_right_after_start_reaches_the_robot() {
    let (url, received) = spawn_fake_robot().await.expect("fake robot");
    let (handle, _task) = spawn_store(Store::default(), 64);
    handle
        .dispatch(TelemetryCommandAction::SetIntakeMotorRpm(250.0))
        .await
        .expect("stage");

    let session = LiveSession::start(&url, handle.clone(), None)
        .await
        .expect("connect");
    let command = session
        .dispatcher
        .send(SendRequest::IntakeRpm)
        .await
        .expect("link is up as soon as start returns");
    assert_eq!(command, OperatorCommand::SetIntakeRpm(250.0));

    let frame = tokio::time::timeout(Duration::from_secs(5), received)
        .await
        .expect("robot received a frame")
        .expect("frame");
    let frame: Value = serde_json::from_str(&frame).expect("json frame");
    assert_eq!(frame["value"], json!(250.0));
}

#[tokio::test]
async fn dropping_a_session_releases_the_store() {
    let (url, _received) = spawn_fake_robot().await.expect("fake robot");
    let (handle, task) = spawn_store(Store::default(), 64);

    let session = LiveSession::start(&url, handle.clone(), None)
        .await
        .expect("connect");
    assert!(handle.current().await.expect("state").socket.is_connected);

    drop(session);
    drop(handle);
    let store = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("store task ends once the session is gone")
        .expect("join");
    assert!(store.snapshot().socket.is_connected);
}

#[tokio::test]
async fn connect_failure_names_the_url() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/ws")).expect("url");
    let (handle, _task) = spawn_store(Store::default(), 8);
    let Err(err) = LiveSession::start(&url, handle, None).await else {
        panic!("connecting to a closed port must fail");
    };
    assert!(matches!(err, DashboardError::Connect { .. }));
    assert!(err.to_string().contains(&addr.to_string()));
}

#[test]
fn robot_url_must_be_a_websocket_url() {
    assert!(parse_robot_url("ws://192.168.43.1:8000/ws").is_ok());
    assert!(parse_robot_url("wss://robot.local/ws").is_ok());
    assert!(matches!(
        parse_robot_url("http://192.168.43.1:8000"),
        Err(DashboardError::InvalidUrl { .. })
    ));
    assert!(matches!(
        parse_robot_url("not a url"),
        Err(DashboardError::InvalidUrl { .. })
    ));
}

#[test]
fn ping_latency_requires_an_eight_byte_payload() {
    let payload = ping_payload();
    assert_eq!(payload.len(), 8);
    assert!(ping_latency_ms(&payload).expect("latency") < 1_000);
    assert_eq!(ping_latency_ms(&[1, 2, 3]), None);
}
