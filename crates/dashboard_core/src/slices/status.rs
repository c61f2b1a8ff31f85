use shared::{domain::StatusState, protocol::StatusUpdate};

#[derive(Debug, Clone, PartialEq)]
pub enum StatusAction {
    Update(StatusUpdate),
}

pub fn reduce(state: &StatusState, action: StatusAction) -> StatusState {
    match action {
        StatusAction::Update(update) => StatusState {
            enabled: update.enabled.unwrap_or(state.enabled),
            battery_voltage: update.battery_voltage.unwrap_or(state.battery_voltage),
        },
    }
}
