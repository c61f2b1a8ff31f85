use shared::{
    domain::{CameraState, DetectionMode},
    protocol::CameraUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CameraAction {
    ReceiveImage(String),
    Update(CameraUpdate),
    SetMode(DetectionMode),
    SetFps(f64),
}

pub fn reduce(state: &CameraState, action: CameraAction) -> CameraState {
    match action {
        CameraAction::ReceiveImage(image_str) => CameraState {
            image_str,
            ..state.clone()
        },
        CameraAction::Update(update) => merge(state, update),
        CameraAction::SetMode(mode) => CameraState {
            mode,
            ..state.clone()
        },
        CameraAction::SetFps(fps) => CameraState {
            fps,
            ..state.clone()
        },
    }
}

fn merge(state: &CameraState, update: CameraUpdate) -> CameraState {
    let mut next = state.clone();
    if let Some(image_str) = update.image_str {
        next.image_str = image_str;
    }
    if let Some(resolution) = update.resolution {
        next.resolution = resolution;
    }
    if let Some(fps) = update.fps {
        next.fps = fps;
    }
    if let Some(objects_detected) = update.objects_detected {
        next.objects_detected = objects_detected;
    }
    if let Some(processing_ms) = update.processing_ms {
        next.processing_ms = processing_ms;
    }
    if let Some(mode) = update.mode {
        next.mode = mode;
    }
    next
}
