use shared::{
    domain::{
        BallColor, BallHolders, DepositState, DetectionMode, IntakeState, Point, Position,
    },
    protocol::{
        CameraUpdate, DepositUpdate, DrivetrainUpdate, IntakeUpdate, OperatorCommand,
        RobotMessage, SnapshotPayload, StatusUpdate,
    },
};

const FIELD_RADIUS: f64 = 48.0;
/// Ticks between path points.
const PATH_EVERY: u64 = 5;

pub struct SimRobot {
    tick: u64,
    intake: IntakeState,
    deposit: DepositState,
    battery_voltage: f64,
}

impl Default for SimRobot {
    fn default() -> Self {
        Self {
            tick: 0,
            intake: IntakeState::default(),
            deposit: DepositState::default(),
            battery_voltage: 13.2,
        }
    }
}

impl SimRobot {
    pub fn apply(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::SetIntakeRpm(rpm) => self.intake.rpm = rpm,
            OperatorCommand::SetFlickServo { servo, position } => {
                self.intake.flick_servos = self.intake.flick_servos.with(servo, position);
            }
            OperatorCommand::SetDepositRpm(rpm) => self.deposit.motor_rpm = rpm,
            OperatorCommand::SetDepositPidf(pidf) => self.deposit.pidf_values = pidf,
        }
    }

    pub fn position(&self) -> Position {
        let angle = (self.tick as f64 * 2.0).to_radians();
        Position::new(
            FIELD_RADIUS * angle.cos(),
            FIELD_RADIUS * angle.sin(),
            (self.tick as f64 * 2.0 + 90.0) % 360.0,
        )
    }

    /// Advance one tick and return the frames to broadcast, in order.
    pub fn step(&mut self) -> Vec<RobotMessage> {
        self.tick += 1;
        self.battery_voltage = (self.battery_voltage - 0.0005).max(11.0);
        let position = self.position();

        let snapshot = RobotMessage::Snapshot(SnapshotPayload {
            camera: Some(CameraUpdate {
                fps: Some(30.0),
                objects_detected: Some((self.tick % 4) as u32),
                processing_ms: Some(12.5),
                mode: Some(DetectionMode::Apriltag),
                ..CameraUpdate::default()
            }),
            drivetrain: Some(DrivetrainUpdate {
                position: Some(position),
                velocity: Some(FIELD_RADIUS * 2.0_f64.to_radians()),
                acceleration: Some(0.0),
                center_of_gravity: Some(Point { x: position.x, y: position.y }),
                path_history: None,
            }),
            intake: Some(IntakeUpdate {
                rpm: Some(self.intake.rpm),
                flick_servos: Some(self.intake.flick_servos),
                ball_holders: Some(self.ball_holders()),
            }),
            deposit: Some(DepositUpdate {
                motor_rpm: Some(self.deposit.motor_rpm),
                pidf_values: Some(self.deposit.pidf_values),
                robot_position: Some(position),
                distance_to_goal: Some((position.x.powi(2) + position.y.powi(2)).sqrt()),
                alliance_color: Some(self.deposit.alliance_color),
            }),
            status: Some(StatusUpdate {
                enabled: Some(true),
                battery_voltage: Some(self.battery_voltage),
            }),
        });

        let mut frames = vec![snapshot];
        if self.tick % PATH_EVERY == 0 {
            frames.push(RobotMessage::PathPoint { position });
        }
        frames
    }

    fn ball_holders(&self) -> BallHolders {
        let cycle = [BallColor::Green, BallColor::Purple, BallColor::Empty];
        let at = |offset: u64| cycle[((self.tick / 20 + offset) % 3) as usize];
        BallHolders {
            pos1: at(0),
            pos2: at(1),
            pos3: at(2),
        }
    }
}
