use shared::{
    domain::{AllianceColor, DepositState, Pidf, Position},
    protocol::DepositUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DepositAction {
    Update(DepositUpdate),
    SetRpm(f64),
    SetPidf(Pidf),
    SetRobotPosition(Position),
    SetDistanceToGoal(f64),
    SetAllianceColor(AllianceColor),
}

pub fn reduce(state: &DepositState, action: DepositAction) -> DepositState {
    let mut next = state.clone();
    match action {
        DepositAction::Update(update) => {
            if let Some(motor_rpm) = update.motor_rpm {
                next.motor_rpm = motor_rpm;
            }
            if let Some(pidf_values) = update.pidf_values {
                next.pidf_values = pidf_values;
            }
            if let Some(robot_position) = update.robot_position {
                next.robot_position = robot_position;
            }
            if let Some(distance_to_goal) = update.distance_to_goal {
                next.distance_to_goal = distance_to_goal;
            }
            if let Some(alliance_color) = update.alliance_color {
                next.alliance_color = alliance_color;
            }
        }
        DepositAction::SetRpm(rpm) => next.motor_rpm = rpm,
        DepositAction::SetPidf(pidf) => next.pidf_values = pidf,
        DepositAction::SetRobotPosition(position) => next.robot_position = position,
        DepositAction::SetDistanceToGoal(distance) => next.distance_to_goal = distance,
        DepositAction::SetAllianceColor(color) => next.alliance_color = color,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_rpm_wins() {
        let state = [DepositAction::SetRpm(100.0), DepositAction::SetRpm(200.0)]
            .into_iter()
            .fold(DepositState::default(), |state, action| reduce(&state, action));
        assert_eq!(state.motor_rpm, 200.0);
    }

    #[test]
    fn update_replaces_pidf_as_a_whole() {
        let next = reduce(
            &DepositState::default(),
            DepositAction::Update(DepositUpdate {
                pidf_values: Some(Pidf::new(1.0, 0.0, 0.0, 0.0)),
                distance_to_goal: Some(42.0),
                ..DepositUpdate::default()
            }),
        );
        assert_eq!(next.pidf_values, Pidf::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(next.distance_to_goal, 42.0);
        assert_eq!(next.alliance_color, AllianceColor::Blue);
        assert_eq!(next.motor_rpm, 0.0);
    }

    #[test]
    fn field_sets_touch_one_field() {
        let state = DepositState::default();
        let next = reduce(&state, DepositAction::SetAllianceColor(AllianceColor::Red));
        assert_eq!(next.alliance_color, AllianceColor::Red);
        assert_eq!(next.pidf_values, state.pidf_values);

        let next = reduce(&next, DepositAction::SetRobotPosition(Position::new(3.0, 4.0, 90.0)));
        assert_eq!(next.robot_position, Position::new(3.0, 4.0, 90.0));
        assert_eq!(next.alliance_color, AllianceColor::Red);
    }
}
