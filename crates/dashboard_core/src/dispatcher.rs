use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{ServoId, ServoPosition, TelemetryCommandState},
    protocol::OperatorCommand,
};
use tracing::{info, warn};

use crate::{
    error::{DashboardError, Result},
    queue::DispatchHandle,
    slices::TelemetryCommandAction,
};

#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send_text(&self, text: String) -> Result<()>;
}

/// Sink used before a live connection exists.
pub struct MissingCommandSink;

#[async_trait]
impl CommandSink for MissingCommandSink {
    async fn send_text(&self, _text: String) -> Result<()> {
        Err(DashboardError::NotConnected)
    }
}

/// What the operator asked to send. Values come from the staged slice,
/// except the servo position, which is chosen at send time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRequest {
    IntakeRpm,
    FlickServo {
        servo: ServoId,
        position: ServoPosition,
    },
    DepositRpm,
    DepositPidf,
}

impl SendRequest {
    pub fn command(&self, staged: &TelemetryCommandState) -> OperatorCommand {
        match *self {
            SendRequest::IntakeRpm => OperatorCommand::SetIntakeRpm(staged.intake_motor_rpm),
            SendRequest::FlickServo { servo, position } => {
                OperatorCommand::SetFlickServo { servo, position }
            }
            SendRequest::DepositRpm => OperatorCommand::SetDepositRpm(staged.deposit_rpm),
            SendRequest::DepositPidf => OperatorCommand::SetDepositPidf(staged.deposit_pidf),
        }
    }
}

/// Optimistic echo of a sent command back into the staged slice.
pub fn mirror_action(command: &OperatorCommand) -> TelemetryCommandAction {
    match *command {
        OperatorCommand::SetIntakeRpm(rpm) => TelemetryCommandAction::SetIntakeMotorRpm(rpm),
        OperatorCommand::SetFlickServo { servo, position } => {
            TelemetryCommandAction::SetFlickServo { servo, position }
        }
        OperatorCommand::SetDepositRpm(rpm) => TelemetryCommandAction::SetDepositRpm(rpm),
        OperatorCommand::SetDepositPidf(pidf) => TelemetryCommandAction::SetDepositPidf(pidf),
    }
}

pub fn encode_command(command: &OperatorCommand) -> Result<String> {
    serde_json::to_string(&command.to_frame()).map_err(DashboardError::Encode)
}

#[derive(Clone)]
pub struct CommandDispatcher {
    dispatch: DispatchHandle,
    sink: Arc<dyn CommandSink>,
}

impl CommandDispatcher {
    pub fn new(dispatch: DispatchHandle, sink: Arc<dyn CommandSink>) -> Self {
        Self { dispatch, sink }
    }

    pub fn disconnected(dispatch: DispatchHandle) -> Self {
        Self::new(dispatch, Arc::new(MissingCommandSink))
    }

    pub fn dispatch_handle(&self) -> &DispatchHandle {
        &self.dispatch
    }

    /// Stage an edit. Never transmits.
    pub async fn stage(&self, action: TelemetryCommandAction) -> Result<()> {
        self.dispatch.dispatch(action).await
    }

    /// Send one staged value to the robot. The value is mirrored into the
    /// staged slice even when the robot is not connected.
    pub async fn send(&self, request: SendRequest) -> Result<OperatorCommand> {
        // The mirror writes back what it read, so the command can be rebuilt
        // from the snapshot it produced.
        let snapshot = self
            .dispatch
            .apply_with(move |state| mirror_action(&request.command(&state.telemetry)).into())
            .await?;
        let command = request.command(&snapshot.telemetry);

        if !snapshot.socket.is_connected {
            warn!(?command, "dropping command, robot not connected");
            return Err(DashboardError::NotConnected);
        }

        let text = encode_command(&command)?;
        self.sink.send_text(text).await?;
        info!(subsystem = ?command.subsystem(), ?command, "command sent");
        Ok(command)
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
