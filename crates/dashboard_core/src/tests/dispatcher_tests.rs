use super::*;
use crate::{queue::spawn_store, slices::ConnectionAction, state::Store};

use serde_json::{json, Value};
use shared::domain::{Pidf, PidfTerm};
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    frames: Mutex<Vec<String>>,
    fail_with_disconnect: bool,
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send_text(&self, text: String) -> Result<()> {
        if self.fail_with_disconnect {
            return Err(DashboardError::NotConnected);
        }
        self.frames.lock().await.push(text);
        Ok(())
    }
}

impl RecordingSink {
    async fn sent(&self) -> Vec<Value> {
        self.frames
            .lock()
            .await
            .iter()
            .map(|text| serde_json::from_str(text).expect("sent frame is json"))
            .collect()
    }
}

async fn connected_dispatcher() -> (CommandDispatcher, Arc<RecordingSink>) {
    let (handle, _task) = spawn_store(Store::default(), 32);
    handle
        .dispatch(ConnectionAction::Connected)
        .await
        .expect("connect");
    let sink = Arc::new(RecordingSink::default());
    (CommandDispatcher::new(handle, sink.clone()), sink)
}

#[tokio::test]
async fn staging_never_transmits() {
    let (dispatcher, sink) = connected_dispatcher().await;
    dispatcher
        .stage(TelemetryCommandAction::SetIntakeMotorRpm(120.0))
        .await
        .expect("stage");
    dispatcher
        .stage(TelemetryCommandAction::SetDepositPidfTerm {
            term: PidfTerm::P,
            value: 0.2,
        })
        .await
        .expect("stage");

    let state = dispatcher.dispatch_handle().current().await.expect("state");
    assert_eq!(state.telemetry.intake_motor_rpm, 120.0);
    assert!(sink.sent().await.is_empty());
}

#[tokio::test]
async fn send_transmits_the_latest_staged_value() {
    let (dispatcher, sink) = connected_dispatcher().await;
    for rpm in [100.0, 250.0, 437.0] {
        dispatcher
            .stage(TelemetryCommandAction::SetIntakeMotorRpm(rpm))
            .await
            .expect("stage");
    }

    let command = dispatcher.send(SendRequest::IntakeRpm).await.expect("send");
    assert_eq!(command, OperatorCommand::SetIntakeRpm(437.0));
    assert_eq!(
        sink.sent().await,
        vec![json!({"type": "command", "subsystem": "intake", "command": "setRpm", "value": 437.0})]
    );
}

#[tokio::test]
async fn each_request_produces_its_wire_frame() {
    let (dispatcher, sink) = connected_dispatcher().await;
    dispatcher
        .stage(TelemetryCommandAction::SetDepositRpm(300.0))
        .await
        .expect("stage");

    dispatcher
        .send(SendRequest::FlickServo {
            servo: ServoId::Servo1,
            position: ServoPosition::Up,
        })
        .await
        .expect("servo");
    dispatcher.send(SendRequest::DepositRpm).await.expect("rpm");
    dispatcher.send(SendRequest::DepositPidf).await.expect("pidf");

    assert_eq!(
        sink.sent().await,
        vec![
            json!({"type": "command", "subsystem": "intake", "command": "setFlickServo", "servo": 1, "position": "up"}),
            json!({"type": "command", "subsystem": "deposit", "command": "setRpm", "value": 300.0}),
            json!({
                "type": "command",
                "subsystem": "deposit",
                "command": "setPidf",
                "values": {"p": 0.06, "i": 0.001, "d": 0.003, "f": 0.1}
            }),
        ]
    );
}

#[tokio::test]
async fn flick_servo_send_mirrors_into_staged_slice() {
    let (dispatcher, _sink) = connected_dispatcher().await;
    dispatcher
        .send(SendRequest::FlickServo {
            servo: ServoId::Servo3,
            position: ServoPosition::Up,
        })
        .await
        .expect("send");

    let state = dispatcher.dispatch_handle().current().await.expect("state");
    assert_eq!(state.telemetry.flick_servos.servo3, ServoPosition::Up);
    assert_eq!(state.telemetry.flick_servos.servo1, ServoPosition::Down);
    // Confirmed robot state only changes when the robot reports it.
    assert_eq!(state.intake.flick_servos.servo3, ServoPosition::Down);
}

#[tokio::test]
async fn send_while_disconnected_is_rejected_but_still_mirrored() {
    let (handle, _task) = spawn_store(Store::default(), 32);
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = CommandDispatcher::new(handle, sink.clone());
    dispatcher
        .stage(TelemetryCommandAction::SetDepositPidf(Pidf::new(0.1, 0.2, 0.3, 0.4)))
        .await
        .expect("stage");

    let err = dispatcher
        .send(SendRequest::DepositPidf)
        .await
        .expect_err("must not send while disconnected");
    assert!(matches!(err, DashboardError::NotConnected));
    assert!(sink.sent().await.is_empty());

    let state = dispatcher.dispatch_handle().current().await.expect("state");
    assert_eq!(state.telemetry.deposit_pidf, Pidf::new(0.1, 0.2, 0.3, 0.4));
}

#[tokio::test]
async fn missing_sink_reports_not_connected() {
    let (handle, _task) = spawn_store(Store::default(), 8);
    handle
        .dispatch(ConnectionAction::Connected)
        .await
        .expect("connect");
    let dispatcher = CommandDispatcher::disconnected(handle);
    let err = dispatcher
        .send(SendRequest::IntakeRpm)
        .await
        .expect_err("no transport");
    assert!(matches!(err, DashboardError::NotConnected));
}

#[tokio::test]
async fn sink_failures_propagate() {
    let (handle, _task) = spawn_store(Store::default(), 8);
    handle
        .dispatch(ConnectionAction::Connected)
        .await
        .expect("connect");
    let sink = Arc::new(RecordingSink {
        fail_with_disconnect: true,
        ..RecordingSink::default()
    });
    let dispatcher = CommandDispatcher::new(handle, sink);
    assert!(dispatcher.send(SendRequest::DepositRpm).await.is_err());
}

#[test]
fn out_of_range_values_are_sent_unclamped() {
    let staged = TelemetryCommandState {
        intake_motor_rpm: 9000.0,
        ..TelemetryCommandState::default()
    };
    assert_eq!(
        SendRequest::IntakeRpm.command(&staged),
        OperatorCommand::SetIntakeRpm(9000.0)
    );
}

#[tokio::test]
async fn stage_queued_behind_a_send_is_not_overwritten_by_its_mirror() {
    let (dispatcher, sink) = connected_dispatcher().await;
    dispatcher
        .stage(TelemetryCommandAction::SetIntakeMotorRpm(120.0))
        .await
        .expect("stage");
    let other = dispatcher.clone();

    let (sent, staged) = tokio::join!(
        dispatcher.send(SendRequest::IntakeRpm),
        other.stage(TelemetryCommandAction::SetIntakeMotorRpm(300.0)),
    );
    assert_eq!(sent.expect("send"), OperatorCommand::SetIntakeRpm(120.0));
    staged.expect("stage");

    let state = dispatcher.dispatch_handle().current().await.expect("state");
    assert_eq!(state.telemetry.intake_motor_rpm, 300.0);
    assert_eq!(sink.sent().await[0]["value"], json!(120.0));
}
