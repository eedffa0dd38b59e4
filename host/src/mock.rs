//! In-memory stand-ins for the runtime objects.
//!
//! Every mock is a cheap handle around shared state: clone it, hand one copy to the engine
//! and keep the other to inspect what the engine did.

use std::sync::{Arc, Mutex};

use crate::{
    Camera, Gamepad, GamepadList, HeadControls, IDENTITY_MATRIX, InputSource, Matrix4, ProgressDisplay,
    TrackedController,
};

#[derive(Debug)]
struct CameraState {
    matrix: Matrix4,
    auto_update: bool,
    writes: Vec<Matrix4>,
}

/// A camera that remembers every transform written into it.
#[derive(Clone, Debug)]
pub struct MockCamera {
    state: Arc<Mutex<CameraState>>,
}

impl MockCamera {
    pub fn new(matrix: Matrix4) -> Self {
        Self {
            state: Arc::new(Mutex::new(CameraState {
                matrix,
                auto_update: true,
                writes: Vec::new(),
            })),
        }
    }

    /// Simulates the tracking path moving the head.
    pub fn move_to(&self, matrix: Matrix4) {
        self.state.lock().expect("Unable to lock mock camera").matrix = matrix;
    }

    pub fn writes(&self) -> Vec<Matrix4> {
        self.state.lock().expect("Unable to lock mock camera").writes.clone()
    }

    pub fn auto_update(&self) -> bool {
        self.state.lock().expect("Unable to lock mock camera").auto_update
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new(IDENTITY_MATRIX)
    }
}

impl Camera for MockCamera {
    fn matrix(&self) -> Matrix4 {
        self.state.lock().expect("Unable to lock mock camera").matrix
    }

    fn set_matrix(&mut self, matrix: &Matrix4) {
        let mut state = self.state.lock().expect("Unable to lock mock camera");
        state.matrix = *matrix;
        state.writes.push(*matrix);
    }

    fn set_matrix_auto_update(&mut self, enabled: bool) {
        self.state.lock().expect("Unable to lock mock camera").auto_update = enabled;
    }
}

#[derive(Debug)]
struct ControlsState {
    standing: Matrix4,
    update_enabled: bool,
}

/// Head-tracking controls with a fixed standing transform.
#[derive(Clone, Debug)]
pub struct MockControls {
    state: Arc<Mutex<ControlsState>>,
}

impl MockControls {
    pub fn new(standing: Matrix4) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControlsState {
                standing,
                update_enabled: true,
            })),
        }
    }

    pub fn update_enabled(&self) -> bool {
        self.state.lock().expect("Unable to lock mock controls").update_enabled
    }
}

impl Default for MockControls {
    fn default() -> Self {
        Self::new(IDENTITY_MATRIX)
    }
}

impl HeadControls for MockControls {
    fn standing_matrix(&self) -> Matrix4 {
        self.state.lock().expect("Unable to lock mock controls").standing
    }

    fn set_update_enabled(&mut self, enabled: bool) {
        self.state.lock().expect("Unable to lock mock controls").update_enabled = enabled;
    }
}

/// A hand controller that records standing-matrix writes.
#[derive(Clone, Debug, Default)]
pub struct MockController {
    writes: Arc<Mutex<Vec<Matrix4>>>,
}

impl MockController {
    pub fn writes(&self) -> Vec<Matrix4> {
        self.writes.lock().expect("Unable to lock mock controller").clone()
    }
}

impl TrackedController for MockController {
    fn set_standing_matrix(&mut self, matrix: &Matrix4) {
        self.writes.lock().expect("Unable to lock mock controller").push(*matrix);
    }
}

/// A gamepad query whose answer can be swapped out between ticks.
#[derive(Clone, Debug, Default)]
pub struct MockInputSource {
    gamepads: Arc<Mutex<GamepadList>>,
}

impl MockInputSource {
    pub fn set(&self, slot: usize, gamepad: Option<Gamepad>) {
        self.gamepads.lock().expect("Unable to lock mock gamepads")[slot] = gamepad;
    }
}

impl InputSource for MockInputSource {
    fn gamepads(&self) -> GamepadList {
        self.gamepads.lock().expect("Unable to lock mock gamepads").clone()
    }
}

/// Collects every counter string the engine shows.
#[derive(Clone, Debug, Default)]
pub struct MockDisplay {
    shown: Arc<Mutex<Vec<String>>>,
}

impl MockDisplay {
    pub fn last(&self) -> Option<String> {
        self.shown.lock().expect("Unable to lock mock display").last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.shown.lock().expect("Unable to lock mock display").clone()
    }
}

impl ProgressDisplay for MockDisplay {
    fn show(&mut self, text: &str) {
        self.shown.lock().expect("Unable to lock mock display").push(text.to_string());
    }
}
