use std::sync::Arc;

use serde::Serialize;
use shared::domain::{
    CameraState, ConnectionState, DepositState, DrivetrainState, IntakeState, SettingsState,
    StatusState, Subsystem, TelemetryCommandState,
};
use tracing::trace;

use crate::slices::{
    self, CameraAction, ConnectionAction, DepositAction, DrivetrainAction, IntakeAction,
    SettingsAction, StatusAction, TelemetryCommandAction,
};

/// Read model handed to observers. Slices an action does not address keep
/// the same `Arc`, so `Arc::ptr_eq` is a valid change check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub camera: Arc<CameraState>,
    pub drivetrain: Arc<DrivetrainState>,
    pub intake: Arc<IntakeState>,
    pub deposit: Arc<DepositState>,
    pub telemetry: Arc<TelemetryCommandState>,
    pub socket: Arc<ConnectionState>,
    pub status: Arc<StatusState>,
    pub settings: Arc<SettingsState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Camera(CameraAction),
    Drivetrain(DrivetrainAction),
    Intake(IntakeAction),
    Deposit(DepositAction),
    Telemetry(TelemetryCommandAction),
    Connection(ConnectionAction),
    Status(StatusAction),
    Settings(SettingsAction),
}

macro_rules! slice_action {
    ($variant:ident, $action:ty) => {
        impl From<$action> for Action {
            fn from(value: $action) -> Self {
                Action::$variant(value)
            }
        }
    };
}

slice_action!(Camera, CameraAction);
slice_action!(Drivetrain, DrivetrainAction);
slice_action!(Intake, IntakeAction);
slice_action!(Deposit, DepositAction);
slice_action!(Telemetry, TelemetryCommandAction);
slice_action!(Connection, ConnectionAction);
slice_action!(Status, StatusAction);
slice_action!(Settings, SettingsAction);

impl Action {
    pub fn subsystem(&self) -> Subsystem {
        match self {
            Action::Camera(_) => Subsystem::Camera,
            Action::Drivetrain(_) => Subsystem::Drivetrain,
            Action::Intake(_) => Subsystem::Intake,
            Action::Deposit(_) => Subsystem::Deposit,
            Action::Telemetry(_) => Subsystem::Telemetry,
            Action::Connection(_) => Subsystem::Connection,
            Action::Status(_) => Subsystem::Status,
            Action::Settings(_) => Subsystem::Settings,
        }
    }
}

pub fn reduce(state: &DashboardState, action: Action) -> DashboardState {
    let mut next = state.clone();
    match action {
        Action::Camera(action) => {
            next.camera = Arc::new(slices::camera::reduce(&state.camera, action));
        }
        Action::Drivetrain(action) => {
            next.drivetrain = Arc::new(slices::drivetrain::reduce(&state.drivetrain, action));
        }
        Action::Intake(action) => {
            next.intake = Arc::new(slices::intake::reduce(&state.intake, action));
        }
        Action::Deposit(action) => {
            next.deposit = Arc::new(slices::deposit::reduce(&state.deposit, action));
        }
        Action::Telemetry(action) => {
            next.telemetry = Arc::new(slices::telemetry::reduce(&state.telemetry, action));
        }
        Action::Connection(action) => {
            next.socket = Arc::new(slices::connection::reduce(&state.socket, action));
        }
        Action::Status(action) => {
            next.status = Arc::new(slices::status::reduce(&state.status, action));
        }
        Action::Settings(action) => {
            next.settings = Arc::new(slices::settings::reduce(&state.settings, action));
        }
    }
    next
}

pub fn fold<I>(initial: DashboardState, actions: I) -> DashboardState
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .fold(initial, |state, action| reduce(&state, action))
}

pub type Listener = Box<dyn FnMut(&Arc<DashboardState>) + Send>;

/// Owns the current snapshot. Pass it around explicitly; there is no global store.
pub struct Store {
    state: Arc<DashboardState>,
    listeners: Vec<Listener>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DashboardState::default())
    }
}

impl Store {
    pub fn new(initial: DashboardState) -> Self {
        Self {
            state: Arc::new(initial),
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<DashboardState> {
        Arc::clone(&self.state)
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn dispatch(&mut self, action: Action) -> Arc<DashboardState> {
        trace!(subsystem = ?action.subsystem(), "dispatch");
        self.state = Arc::new(reduce(&self.state, action));
        for listener in &mut self.listeners {
            listener(&self.state);
        }
        Arc::clone(&self.state)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
