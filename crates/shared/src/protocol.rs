use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        AllianceColor, BallColor, BallHolders, DetectionMode, FlickServos, HolderSlot, Pidf,
        Point, Position, ServoId, ServoPosition, Subsystem,
    },
    error::FrameError,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_detected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<DetectionMode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrivetrainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_of_gravity: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_history: Option<Vec<Position>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntakeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flick_servos: Option<FlickServos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_holders: Option<BallHolders>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepositUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor_rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pidf_values: Option<Pidf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alliance_color: Option<AllianceColor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelemetryCommandUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake_motor_rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flick_servos: Option<FlickServos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_pidf: Option<Pidf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_voltage: Option<f64>,
}

/// Every section is optional; present sections are applied in field order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivetrain: Option<DrivetrainUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake: Option<IntakeUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<DepositUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusUpdate>,
}

/// Messages streamed by the robot over the live connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RobotMessage {
    Camera(CameraUpdate),
    CameraImage {
        #[serde(rename = "imageString")]
        image_string: String,
    },
    Drivetrain(DrivetrainUpdate),
    PathPoint {
        position: Position,
    },
    PathClear,
    Intake(IntakeUpdate),
    FlickServo {
        servo: ServoId,
        position: ServoPosition,
    },
    BallHolder {
        slot: HolderSlot,
        color: BallColor,
    },
    Deposit(DepositUpdate),
    Status(StatusUpdate),
    Snapshot(SnapshotPayload),
}

/// A typed operator command for the robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorCommand {
    SetIntakeRpm(f64),
    SetFlickServo {
        servo: ServoId,
        position: ServoPosition,
    },
    SetDepositRpm(f64),
    SetDepositPidf(Pidf),
}

impl OperatorCommand {
    pub fn subsystem(&self) -> Subsystem {
        match self {
            OperatorCommand::SetIntakeRpm(_) | OperatorCommand::SetFlickServo { .. } => {
                Subsystem::Intake
            }
            OperatorCommand::SetDepositRpm(_) | OperatorCommand::SetDepositPidf(_) => {
                Subsystem::Deposit
            }
        }
    }

    pub fn to_frame(&self) -> CommandFrame {
        let mut frame = CommandFrame {
            kind: FrameKind::Command,
            subsystem: self.subsystem(),
            command: CommandName::SetRpm,
            value: None,
            servo: None,
            position: None,
            values: None,
        };
        match *self {
            OperatorCommand::SetIntakeRpm(rpm) | OperatorCommand::SetDepositRpm(rpm) => {
                frame.value = Some(rpm);
            }
            OperatorCommand::SetFlickServo { servo, position } => {
                frame.command = CommandName::SetFlickServo;
                frame.servo = Some(servo.number());
                frame.position = Some(position);
            }
            OperatorCommand::SetDepositPidf(pidf) => {
                frame.command = CommandName::SetPidf;
                frame.values = Some(pidf);
            }
        }
        frame
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandName {
    SetRpm,
    SetFlickServo,
    SetPidf,
}

/// Wire shape of an outbound command frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub subsystem: Subsystem,
    pub command: CommandName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servo: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ServoPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Pidf>,
}

impl From<&OperatorCommand> for CommandFrame {
    fn from(value: &OperatorCommand) -> Self {
        value.to_frame()
    }
}

impl TryFrom<CommandFrame> for OperatorCommand {
    type Error = FrameError;

    fn try_from(frame: CommandFrame) -> Result<Self, Self::Error> {
        match (frame.subsystem, frame.command) {
            (Subsystem::Intake, CommandName::SetRpm) => frame
                .value
                .map(OperatorCommand::SetIntakeRpm)
                .ok_or(FrameError::MissingField("value")),
            (Subsystem::Intake, CommandName::SetFlickServo) => {
                let number = frame.servo.ok_or(FrameError::MissingField("servo"))?;
                let servo = ServoId::from_number(number).ok_or(FrameError::UnknownServo(number))?;
                let position = frame.position.ok_or(FrameError::MissingField("position"))?;
                Ok(OperatorCommand::SetFlickServo { servo, position })
            }
            (Subsystem::Deposit, CommandName::SetRpm) => frame
                .value
                .map(OperatorCommand::SetDepositRpm)
                .ok_or(FrameError::MissingField("value")),
            (Subsystem::Deposit, CommandName::SetPidf) => frame
                .values
                .map(OperatorCommand::SetDepositPidf)
                .ok_or(FrameError::MissingField("values")),
            (subsystem, command) => Err(FrameError::Unsupported { subsystem, command }),
        }
    }
}
