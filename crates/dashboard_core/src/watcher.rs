use futures::{Stream, StreamExt};
use shared::protocol::RobotMessage;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::{
    error::{DashboardError, Result},
    queue::DispatchHandle,
    slices::{
        CameraAction, ConnectionAction, DepositAction, DrivetrainAction, IntakeAction,
        StatusAction,
    },
    state::Action,
    transport::ping_latency_ms,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub messages: usize,
    pub dispatched: usize,
    pub dropped: usize,
}

pub fn decode_message(text: &str) -> Result<Vec<Action>> {
    let message: RobotMessage = serde_json::from_str(text).map_err(DashboardError::Decode)?;
    Ok(actions_for(message))
}

pub fn actions_for(message: RobotMessage) -> Vec<Action> {
    match message {
        RobotMessage::Camera(update) => vec![CameraAction::Update(update).into()],
        RobotMessage::CameraImage { image_string } => {
            vec![CameraAction::ReceiveImage(image_string).into()]
        }
        RobotMessage::Drivetrain(update) => vec![DrivetrainAction::Update(update).into()],
        RobotMessage::PathPoint { position } => {
            vec![DrivetrainAction::AddPathPoint(position).into()]
        }
        RobotMessage::PathClear => vec![DrivetrainAction::ClearPathHistory.into()],
        RobotMessage::Intake(update) => vec![IntakeAction::Update(update).into()],
        RobotMessage::FlickServo { servo, position } => {
            vec![IntakeAction::SetFlickServo { servo, position }.into()]
        }
        RobotMessage::BallHolder { slot, color } => {
            vec![IntakeAction::SetBallHolder { slot, color }.into()]
        }
        RobotMessage::Deposit(update) => vec![DepositAction::Update(update).into()],
        RobotMessage::Status(update) => vec![StatusAction::Update(update).into()],
        RobotMessage::Snapshot(snapshot) => {
            let mut actions = Vec::with_capacity(5);
            if let Some(update) = snapshot.camera {
                actions.push(CameraAction::Update(update).into());
            }
            if let Some(update) = snapshot.drivetrain {
                actions.push(DrivetrainAction::Update(update).into());
            }
            if let Some(update) = snapshot.intake {
                actions.push(IntakeAction::Update(update).into());
            }
            if let Some(update) = snapshot.deposit {
                actions.push(DepositAction::Update(update).into());
            }
            if let Some(update) = snapshot.status {
                actions.push(StatusAction::Update(update).into());
            }
            actions
        }
    }
}

/// Runs until the feed closes or errors, then marks the connection as down.
/// The caller marks it up before the first frame is read.
pub async fn watch_feed<S>(mut feed: S, dispatch: DispatchHandle) -> Result<WatchSummary>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    let mut summary = WatchSummary::default();

    while let Some(frame) = feed.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                summary.messages += 1;
                match decode_message(&text) {
                    Ok(actions) => {
                        for action in actions {
                            dispatch.dispatch(action).await?;
                            summary.dispatched += 1;
                        }
                    }
                    Err(error) => {
                        summary.dropped += 1;
                        warn!(%error, "dropping robot message");
                    }
                }
            }
            Ok(Message::Pong(payload)) => {
                if let Some(latency) = ping_latency_ms(&payload) {
                    dispatch
                        .dispatch(ConnectionAction::PingMeasured(latency))
                        .await?;
                }
            }
            Ok(Message::Close(frame)) => {
                debug!(?frame, "robot closed the feed");
                break;
            }
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "robot feed receive failed");
                break;
            }
        }
    }

    dispatch.dispatch(ConnectionAction::Disconnected).await?;
    info!(
        messages = summary.messages,
        dispatched = summary.dispatched,
        dropped = summary.dropped,
        "robot feed ended"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "tests/watcher_tests.rs"]
mod tests;
