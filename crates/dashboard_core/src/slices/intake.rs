use shared::{
    domain::{BallColor, HolderSlot, IntakeState, ServoId, ServoPosition},
    protocol::IntakeUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeAction {
    Update(IntakeUpdate),
    SetRpm(f64),
    SetFlickServo {
        servo: ServoId,
        position: ServoPosition,
    },
    SetBallHolder {
        slot: HolderSlot,
        color: BallColor,
    },
}

pub fn reduce(state: &IntakeState, action: IntakeAction) -> IntakeState {
    match action {
        IntakeAction::Update(update) => IntakeState {
            rpm: update.rpm.unwrap_or(state.rpm),
            flick_servos: update.flick_servos.unwrap_or(state.flick_servos),
            ball_holders: update.ball_holders.unwrap_or(state.ball_holders),
        },
        IntakeAction::SetRpm(rpm) => IntakeState {
            rpm,
            ..state.clone()
        },
        IntakeAction::SetFlickServo { servo, position } => IntakeState {
            flick_servos: state.flick_servos.with(servo, position),
            ..state.clone()
        },
        IntakeAction::SetBallHolder { slot, color } => IntakeState {
            ball_holders: state.ball_holders.with(slot, color),
            ..state.clone()
        },
    }
}
