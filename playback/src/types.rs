use serde::{Deserialize, Serialize};
use vr_host_integrations::Matrix4;

/// Number of axes captured per gamepad (the stick or trackpad X/Y).
pub const SNAPSHOT_AXES: usize = 2;

/// Number of buttons captured per gamepad. Index order is the runtime's own and is kept as-is.
pub const SNAPSHOT_BUTTONS: usize = 4;

/// Number of controller slots that are recorded.
pub const CONTROLLER_SLOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonSnapshot {
    pub pressed: bool,
    pub touched: bool,
    pub value: f64,
}

/// Raw device-space pose of a gamepad at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub position: Option<[f32; 3]>,
    pub orientation: Option<[f32; 4]>,
}

/// The minimal, serializable subset of a gamepad's state.
///
/// Field order here is the key order in session files; don't reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub axes: [f64; SNAPSHOT_AXES],
    pub buttons: [ButtonSnapshot; SNAPSHOT_BUTTONS],
    pub pose: PoseSnapshot,
}

/// One sampled instant of tracking state.
///
/// `standing_matrix` is a single value shared by both controllers: the capture reads the
/// controls' standing transform once and playback writes it into every available controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFrame", into = "RawFrame")]
pub struct FramePacket {
    pub camera_matrix: Matrix4,
    pub standing_matrix: Matrix4,
    pub controllers: [Option<InputSnapshot>; CONTROLLER_SLOTS],
}

/// On disk a frame is the positional tuple `[camera, standing, controller0, controller1]`.
#[derive(Serialize, Deserialize)]
struct RawFrame(Matrix4, Matrix4, Option<InputSnapshot>, Option<InputSnapshot>);

impl From<RawFrame> for FramePacket {
    fn from(RawFrame(camera_matrix, standing_matrix, controller0, controller1): RawFrame) -> Self {
        Self {
            camera_matrix,
            standing_matrix,
            controllers: [controller0, controller1],
        }
    }
}

impl From<FramePacket> for RawFrame {
    fn from(frame: FramePacket) -> Self {
        let [controller0, controller1] = frame.controllers;
        RawFrame(frame.camera_matrix, frame.standing_matrix, controller0, controller1)
    }
}
