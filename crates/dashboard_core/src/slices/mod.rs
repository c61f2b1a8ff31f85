pub mod camera;
pub mod connection;
pub mod deposit;
pub mod drivetrain;
pub mod intake;
pub mod settings;
pub mod status;
pub mod telemetry;

pub use camera::CameraAction;
pub use connection::ConnectionAction;
pub use deposit::DepositAction;
pub use drivetrain::DrivetrainAction;
pub use intake::IntakeAction;
pub use settings::SettingsAction;
pub use status::StatusAction;
pub use telemetry::TelemetryCommandAction;
