/// Number of slots the gamepad query reports. Only the first two are ever populated by
/// tracked hand controllers.
pub const GAMEPAD_SLOTS: usize = 4;

/// The result of a gamepad query: one entry per slot, `None` when nothing is connected.
pub type GamepadList = [Option<Gamepad>; GAMEPAD_SLOTS];

/// A live gamepad as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gamepad {
    pub id: String,
    pub axes: Vec<f64>,
    pub buttons: Vec<GamepadButton>,
    pub pose: GamepadPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadButton {
    pub pressed: bool,
    pub touched: bool,
    pub value: f64,
}

impl GamepadButton {
    pub fn new(pressed: bool, touched: bool, value: f64) -> Self {
        Self { pressed, touched, value }
    }
}

/// Raw device-space pose of a gamepad. Either half may be missing if the device can't
/// provide it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadPose {
    pub position: Option<[f32; 3]>,
    pub orientation: Option<[f32; 4]>,
}

/// The gamepad query that application code calls into.
///
/// Application code should be handed an `InputSource` rather than reaching for the runtime
/// directly, so that a replayed source can stand in for the live one without the caller
/// noticing.
pub trait InputSource: Send + Sync {
    fn gamepads(&self) -> GamepadList;
}

/// An input source with nothing plugged in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInputSource;

impl InputSource for NoInputSource {
    fn gamepads(&self) -> GamepadList {
        [None, None, None, None]
    }
}

