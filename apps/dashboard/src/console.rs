use dashboard_core::{
    slices::{DrivetrainAction, SettingsAction, TelemetryCommandAction},
    Action, CommandDispatcher, DashboardError, SendRequest,
};
use shared::domain::{LayoutPreset, Pidf, PidfTerm, ServoId, ServoPosition, Subsystem};
use thiserror::Error;

pub const INTAKE_RPM_MAX: f64 = 500.0;
pub const DEPOSIT_RPM_MAX: f64 = 600.0;

pub const HELP: &str = "\
commands:
  stage intake <rpm>            stage intake motor rpm (0-500)
  stage deposit <rpm>           stage deposit rpm (0-600)
  stage pidf <p|i|d|f> <value>  stage one pidf term
  stage pidf <p> <i> <d> <f>    stage all pidf terms
  send intake|deposit|pidf      send a staged value to the robot
  send servo <1-3> <up|down>    move one flick servo
  layout <preset>               drivetrain, intake, camera, deposit or telemetry
  clear-path                    clear the drivetrain path trail
  show [subsystem]              print the current snapshot
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Stage(TelemetryCommandAction),
    Send(SendRequest),
    Local(Action),
    Show(Option<Subsystem>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command `{0}`, try `help`")]
    UnknownCommand(String),
    #[error("`{0}` is missing an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("unexpected argument `{0}`")]
    Unexpected(String),
}

pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head {
        "stage" => ConsoleCommand::Stage(parse_stage(&rest)?),
        "send" => ConsoleCommand::Send(parse_send(&rest)?),
        "layout" => {
            let name = rest.first().ok_or(ConsoleError::MissingArgument("layout"))?;
            ConsoleCommand::Local(SettingsAction::SetLayoutPreset(parse_layout(name)?).into())
        }
        "clear-path" => ConsoleCommand::Local(DrivetrainAction::ClearPathHistory.into()),
        "show" => ConsoleCommand::Show(rest.first().map(|name| parse_subsystem(name)).transpose()?),
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_stage(args: &[&str]) -> Result<TelemetryCommandAction, ConsoleError> {
    match args {
        ["intake", rpm] => Ok(TelemetryCommandAction::SetIntakeMotorRpm(clamp_rpm(
            number(rpm)?,
            INTAKE_RPM_MAX,
        ))),
        ["deposit", rpm] => Ok(TelemetryCommandAction::SetDepositRpm(clamp_rpm(
            number(rpm)?,
            DEPOSIT_RPM_MAX,
        ))),
        ["pidf", term, value] => {
            let term = parse_term(term)?;
            Ok(TelemetryCommandAction::SetDepositPidfTerm {
                term,
                value: clamp_term(term, number(value)?),
            })
        }
        ["pidf", p, i, d, f] => Ok(TelemetryCommandAction::SetDepositPidf(Pidf::new(
            clamp_term(PidfTerm::P, number(p)?),
            clamp_term(PidfTerm::I, number(i)?),
            clamp_term(PidfTerm::D, number(d)?),
            clamp_term(PidfTerm::F, number(f)?),
        ))),
        [] | ["intake"] | ["deposit"] | ["pidf"] | ["pidf", _] => {
            Err(ConsoleError::MissingArgument("stage"))
        }
        [other, ..] => Err(ConsoleError::Unexpected(other.to_string())),
    }
}

fn parse_send(args: &[&str]) -> Result<SendRequest, ConsoleError> {
    match args {
        ["intake"] => Ok(SendRequest::IntakeRpm),
        ["deposit"] => Ok(SendRequest::DepositRpm),
        ["pidf"] => Ok(SendRequest::DepositPidf),
        ["servo", servo, position] => {
            let servo = servo
                .parse::<u8>()
                .ok()
                .and_then(ServoId::from_number)
                .ok_or_else(|| ConsoleError::Unexpected(servo.to_string()))?;
            let position = match *position {
                "up" => ServoPosition::Up,
                "down" => ServoPosition::Down,
                other => return Err(ConsoleError::Unexpected(other.to_string())),
            };
            Ok(SendRequest::FlickServo { servo, position })
        }
        [] | ["servo"] | ["servo", _] => Err(ConsoleError::MissingArgument("send")),
        [other, ..] => Err(ConsoleError::Unexpected(other.to_string())),
    }
}

fn parse_term(raw: &str) -> Result<PidfTerm, ConsoleError> {
    match raw {
        "p" => Ok(PidfTerm::P),
        "i" => Ok(PidfTerm::I),
        "d" => Ok(PidfTerm::D),
        "f" => Ok(PidfTerm::F),
        other => Err(ConsoleError::Unexpected(other.to_string())),
    }
}

fn parse_layout(raw: &str) -> Result<LayoutPreset, ConsoleError> {
    match raw.to_ascii_lowercase().as_str() {
        "drivetrain" => Ok(LayoutPreset::Drivetrain),
        "intake" => Ok(LayoutPreset::Intake),
        "camera" => Ok(LayoutPreset::Camera),
        "deposit" => Ok(LayoutPreset::Deposit),
        "telemetry" => Ok(LayoutPreset::Telemetry),
        _ => Err(ConsoleError::Unexpected(raw.to_string())),
    }
}

fn parse_subsystem(raw: &str) -> Result<Subsystem, ConsoleError> {
    serde_json::from_value(serde_json::Value::String(raw.to_ascii_lowercase()))
        .map_err(|_| ConsoleError::Unexpected(raw.to_string()))
}

fn number(raw: &str) -> Result<f64, ConsoleError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConsoleError::NotANumber(raw.to_string()))
}

fn clamp_rpm(rpm: f64, max: f64) -> f64 {
    rpm.clamp(0.0, max)
}

/// Same ranges as the tuning inputs on the robot's dashboard.
fn clamp_term(term: PidfTerm, value: f64) -> f64 {
    let max = match term {
        PidfTerm::P | PidfTerm::F => 1.0,
        PidfTerm::I | PidfTerm::D => 0.1,
    };
    value.clamp(0.0, max)
}

/// Runs one command and returns the text to print, if any.
pub async fn execute(
    dispatcher: &CommandDispatcher,
    command: ConsoleCommand,
) -> Result<Option<String>, DashboardError> {
    match command {
        ConsoleCommand::Stage(action) => {
            dispatcher.stage(action).await?;
            Ok(None)
        }
        ConsoleCommand::Send(request) => {
            let command = dispatcher.send(request).await?;
            Ok(Some(format!("sent {command:?}")))
        }
        ConsoleCommand::Local(action) => {
            dispatcher.dispatch_handle().dispatch(action).await?;
            Ok(None)
        }
        ConsoleCommand::Show(subsystem) => {
            let snapshot = dispatcher.dispatch_handle().current().await?;
            let mut value = serde_json::to_value(&*snapshot).map_err(DashboardError::Encode)?;
            if let Some(subsystem) = subsystem {
                value = value
                    .get(snapshot_key(subsystem))
                    .cloned()
                    .unwrap_or_default();
            }
            serde_json::to_string_pretty(&value)
                .map(Some)
                .map_err(DashboardError::Encode)
        }
        ConsoleCommand::Help => Ok(Some(HELP.to_string())),
        ConsoleCommand::Quit => Ok(None),
    }
}

fn snapshot_key(subsystem: Subsystem) -> &'static str {
    match subsystem {
        Subsystem::Camera => "camera",
        Subsystem::Drivetrain => "drivetrain",
        Subsystem::Intake => "intake",
        Subsystem::Deposit => "deposit",
        Subsystem::Telemetry => "telemetry",
        Subsystem::Connection => "socket",
        Subsystem::Status => "status",
        Subsystem::Settings => "settings",
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
