use shared::{
    domain::{DrivetrainState, Position, PATH_HISTORY_LIMIT},
    protocol::DrivetrainUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrivetrainAction {
    Update(DrivetrainUpdate),
    AddPathPoint(Position),
    ClearPathHistory,
}

pub fn reduce(state: &DrivetrainState, action: DrivetrainAction) -> DrivetrainState {
    match action {
        DrivetrainAction::Update(update) => merge(state, update),
        DrivetrainAction::AddPathPoint(position) => {
            // Oldest points fall off once the history is full.
            let skip = (state.path_history.len() + 1).saturating_sub(PATH_HISTORY_LIMIT);
            let mut path_history = state.path_history[skip..].to_vec();
            path_history.push(position);
            DrivetrainState {
                path_history,
                ..state.clone()
            }
        }
        DrivetrainAction::ClearPathHistory => DrivetrainState {
            path_history: Vec::new(),
            ..state.clone()
        },
    }
}

fn merge(state: &DrivetrainState, update: DrivetrainUpdate) -> DrivetrainState {
    let mut next = state.clone();
    if let Some(position) = update.position {
        next.position = position;
    }
    if let Some(velocity) = update.velocity {
        next.velocity = velocity;
    }
    if let Some(acceleration) = update.acceleration {
        next.acceleration = acceleration;
    }
    if let Some(center_of_gravity) = update.center_of_gravity {
        next.center_of_gravity = center_of_gravity;
    }
    if let Some(mut path_history) = update.path_history {
        if path_history.len() > PATH_HISTORY_LIMIT {
            path_history.drain(..path_history.len() - PATH_HISTORY_LIMIT);
        }
        next.path_history = path_history;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> Position {
        Position::new(i as f64, (i * 2) as f64, 0.0)
    }

    #[test]
    fn appending_past_the_limit_keeps_the_most_recent_points_in_order() {
        let mut state = DrivetrainState::default();
        for i in 0..250 {
            state = reduce(&state, DrivetrainAction::AddPathPoint(point(i)));
        }
        assert_eq!(state.path_history.len(), PATH_HISTORY_LIMIT);
        let expected: Vec<Position> = (50..250).map(point).collect();
        assert_eq!(state.path_history, expected);
    }

    #[test]
    fn three_appends_start_with_the_first_point() {
        let mut state = DrivetrainState::default();
        for _ in 0..3 {
            state = reduce(
                &state,
                DrivetrainAction::AddPathPoint(Position::new(1.0, 2.0, 0.0)),
            );
        }
        assert_eq!(state.path_history.len(), 3);
        assert_eq!(state.path_history[0], Position::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn clear_empties_history_of_any_length() {
        for len in [0usize, 1, 200] {
            let state = DrivetrainState {
                path_history: (0..len).map(point).collect(),
                ..DrivetrainState::default()
            };
            let next = reduce(&state, DrivetrainAction::ClearPathHistory);
            assert!(next.path_history.is_empty());
        }
    }

    #[test]
    fn bulk_history_replacement_is_bounded_too() {
        let next = reduce(
            &DrivetrainState::default(),
            DrivetrainAction::Update(DrivetrainUpdate {
                path_history: Some((0..260).map(point).collect()),
                ..DrivetrainUpdate::default()
            }),
        );
        assert_eq!(next.path_history.len(), PATH_HISTORY_LIMIT);
        assert_eq!(next.path_history[0], point(60));
    }

    #[test]
    fn update_without_history_preserves_it() {
        let state = reduce(
            &DrivetrainState::default(),
            DrivetrainAction::AddPathPoint(point(1)),
        );
        let next = reduce(
            &state,
            DrivetrainAction::Update(DrivetrainUpdate {
                velocity: Some(1.5),
                ..DrivetrainUpdate::default()
            }),
        );
        assert_eq!(next.velocity, 1.5);
        assert_eq!(next.path_history, vec![point(1)]);
    }
}
