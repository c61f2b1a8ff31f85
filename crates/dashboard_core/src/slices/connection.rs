use shared::domain::ConnectionState;

/// Driven by the transport, never by the robot's payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAction {
    Connected,
    Disconnected,
    PingMeasured(u64),
}

pub fn reduce(state: &ConnectionState, action: ConnectionAction) -> ConnectionState {
    match action {
        ConnectionAction::Connected => ConnectionState {
            is_connected: true,
            ..state.clone()
        },
        ConnectionAction::Disconnected => ConnectionState {
            is_connected: false,
            ping_time: 0,
        },
        ConnectionAction::PingMeasured(ping_time) => ConnectionState {
            ping_time,
            ..state.clone()
        },
    }
}
