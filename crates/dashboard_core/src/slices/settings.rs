use shared::domain::{LayoutPreset, SettingsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    SetLayoutPreset(LayoutPreset),
}

// Every action replaces the only field, so the previous state is never read.
pub fn reduce(_state: &SettingsState, action: SettingsAction) -> SettingsState {
    match action {
        SettingsAction::SetLayoutPreset(layout_preset) => SettingsState { layout_preset },
    }
}
