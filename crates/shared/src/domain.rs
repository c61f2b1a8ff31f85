use serde::{Deserialize, Serialize};

/// Longest path history the drivetrain slice keeps.
pub const PATH_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub heading: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pidf {
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub f: f64,
}

impl Pidf {
    pub fn new(p: f64, i: f64, d: f64, f: f64) -> Self {
        Self { p, i, d, f }
    }

    pub fn with_term(mut self, term: PidfTerm, value: f64) -> Self {
        match term {
            PidfTerm::P => self.p = value,
            PidfTerm::I => self.i = value,
            PidfTerm::D => self.d = value,
            PidfTerm::F => self.f = value,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PidfTerm {
    P,
    I,
    D,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMode {
    Apriltag,
    ColorDetection,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServoPosition {
    Up,
    #[default]
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    Green,
    Purple,
    #[default]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllianceColor {
    Red,
    #[default]
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServoId {
    Servo1,
    Servo2,
    Servo3,
}

impl ServoId {
    pub const ALL: [ServoId; 3] = [ServoId::Servo1, ServoId::Servo2, ServoId::Servo3];

    /// One-based index used by the robot's command protocol.
    pub fn number(self) -> u8 {
        match self {
            ServoId::Servo1 => 1,
            ServoId::Servo2 => 2,
            ServoId::Servo3 => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(ServoId::Servo1),
            2 => Some(ServoId::Servo2),
            3 => Some(ServoId::Servo3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolderSlot {
    Pos1,
    Pos2,
    Pos3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlickServos {
    pub servo1: ServoPosition,
    pub servo2: ServoPosition,
    pub servo3: ServoPosition,
}

impl FlickServos {
    pub fn get(&self, servo: ServoId) -> ServoPosition {
        match servo {
            ServoId::Servo1 => self.servo1,
            ServoId::Servo2 => self.servo2,
            ServoId::Servo3 => self.servo3,
        }
    }

    pub fn with(mut self, servo: ServoId, position: ServoPosition) -> Self {
        match servo {
            ServoId::Servo1 => self.servo1 = position,
            ServoId::Servo2 => self.servo2 = position,
            ServoId::Servo3 => self.servo3 = position,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BallHolders {
    pub pos1: BallColor,
    pub pos2: BallColor,
    pub pos3: BallColor,
}

impl BallHolders {
    pub fn get(&self, slot: HolderSlot) -> BallColor {
        match slot {
            HolderSlot::Pos1 => self.pos1,
            HolderSlot::Pos2 => self.pos2,
            HolderSlot::Pos3 => self.pos3,
        }
    }

    pub fn with(mut self, slot: HolderSlot, color: BallColor) -> Self {
        match slot {
            HolderSlot::Pos1 => self.pos1 = color,
            HolderSlot::Pos2 => self.pos2 = color,
            HolderSlot::Pos3 => self.pos3 = color,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Camera,
    Drivetrain,
    Intake,
    Deposit,
    Telemetry,
    Connection,
    Status,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutPreset {
    #[default]
    Drivetrain,
    Intake,
    Camera,
    Deposit,
    Telemetry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub image_str: String,
    pub resolution: String,
    pub fps: f64,
    pub objects_detected: u32,
    pub processing_ms: f64,
    pub mode: DetectionMode,
}

impl CameraState {
    /// Object counts only mean something while a detector is running.
    pub fn objects_meaningful(&self) -> bool {
        self.mode != DetectionMode::None
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            image_str: String::new(),
            resolution: "1920x1080".into(),
            fps: 0.0,
            objects_detected: 0,
            processing_ms: 0.0,
            mode: DetectionMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivetrainState {
    pub position: Position,
    pub velocity: f64,
    pub acceleration: f64,
    pub center_of_gravity: Point,
    pub path_history: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeState {
    pub rpm: f64,
    pub flick_servos: FlickServos,
    pub ball_holders: BallHolders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositState {
    pub motor_rpm: f64,
    pub pidf_values: Pidf,
    pub robot_position: Position,
    pub distance_to_goal: f64,
    pub alliance_color: AllianceColor,
}

impl Default for DepositState {
    fn default() -> Self {
        Self {
            motor_rpm: 0.0,
            pidf_values: Pidf::new(0.05, 0.001, 0.002, 0.1),
            robot_position: Position::default(),
            distance_to_goal: 0.0,
            alliance_color: AllianceColor::Blue,
        }
    }
}

/// Operator-staged outbound values. Pending intent, not confirmed robot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryCommandState {
    pub intake_motor_rpm: f64,
    pub flick_servos: FlickServos,
    pub deposit_rpm: f64,
    pub deposit_pidf: Pidf,
}

impl Default for TelemetryCommandState {
    fn default() -> Self {
        Self {
            intake_motor_rpm: 0.0,
            flick_servos: FlickServos::default(),
            deposit_rpm: 0.0,
            deposit_pidf: Pidf::new(0.06, 0.001, 0.003, 0.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub is_connected: bool,
    /// Last measured round trip in milliseconds.
    pub ping_time: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusState {
    pub enabled: bool,
    pub battery_voltage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsState {
    pub layout_preset: LayoutPreset,
}
