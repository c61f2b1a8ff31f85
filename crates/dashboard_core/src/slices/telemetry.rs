use shared::{
    domain::{Pidf, PidfTerm, ServoId, ServoPosition, TelemetryCommandState},
    protocol::TelemetryCommandUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryCommandAction {
    Update(TelemetryCommandUpdate),
    SetIntakeMotorRpm(f64),
    SetFlickServo {
        servo: ServoId,
        position: ServoPosition,
    },
    SetDepositRpm(f64),
    SetDepositPidf(Pidf),
    /// Edit one PIDF term, keeping the staged values of the other three.
    SetDepositPidfTerm {
        term: PidfTerm,
        value: f64,
    },
}

pub fn reduce(state: &TelemetryCommandState, action: TelemetryCommandAction) -> TelemetryCommandState {
    match action {
        TelemetryCommandAction::Update(update) => TelemetryCommandState {
            intake_motor_rpm: update.intake_motor_rpm.unwrap_or(state.intake_motor_rpm),
            flick_servos: update.flick_servos.unwrap_or(state.flick_servos),
            deposit_rpm: update.deposit_rpm.unwrap_or(state.deposit_rpm),
            deposit_pidf: update.deposit_pidf.unwrap_or(state.deposit_pidf),
        },
        TelemetryCommandAction::SetIntakeMotorRpm(intake_motor_rpm) => TelemetryCommandState {
            intake_motor_rpm,
            ..state.clone()
        },
        TelemetryCommandAction::SetFlickServo { servo, position } => TelemetryCommandState {
            flick_servos: state.flick_servos.with(servo, position),
            ..state.clone()
        },
        TelemetryCommandAction::SetDepositRpm(deposit_rpm) => TelemetryCommandState {
            deposit_rpm,
            ..state.clone()
        },
        TelemetryCommandAction::SetDepositPidf(deposit_pidf) => TelemetryCommandState {
            deposit_pidf,
            ..state.clone()
        },
        TelemetryCommandAction::SetDepositPidfTerm { term, value } => TelemetryCommandState {
            deposit_pidf: state.deposit_pidf.with_term(term, value),
            ..state.clone()
        },
    }
}
