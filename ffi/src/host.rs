//! Adapters that turn the host's C callbacks into the runtime traits the engine drives.

use std::ffi::{CString, c_char};

use vr_host_integrations::{
    Camera, Gamepad, GamepadButton, GamepadList, GamepadPose, HeadControls, IDENTITY_MATRIX,
    InputSource, Log, Matrix4, ProgressDisplay, TrackedController,
};

/// Writes 16 floats into the provided buffer.
pub type ForeignReadMatrixFn = unsafe extern "C" fn(context: usize, out: *mut f32);

/// Reads 16 floats from the provided buffer.
pub type ForeignWriteMatrixFn = unsafe extern "C" fn(context: usize, matrix: *const f32);

pub type ForeignSetFlagFn = unsafe extern "C" fn(context: usize, enabled: bool);

/// Reads 16 floats for the controller in `slot`.
pub type ForeignWriteControllerMatrixFn = unsafe extern "C" fn(context: usize, slot: u32, matrix: *const f32);

/// Fills `out` for the gamepad in `slot`, returning `false` if nothing is connected there.
pub type ForeignGetGamepadFn = unsafe extern "C" fn(context: usize, slot: u32, out: *mut VRPlayerGamepad) -> bool;

pub type ForeignShowProgressFn = unsafe extern "C" fn(context: usize, text: *const c_char);

/// The table of callbacks the host hands over when creating an engine.
///
/// `context` is passed back untouched as the first argument of every callback. Any callback
/// may be null; a missing camera or controls callback disables record and play, a missing
/// gamepad callback means no gamepads are connected, and a missing progress callback means
/// the counter isn't shown anywhere.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct VRPlayerHostHooks {
    pub context: usize,

    // Camera
    pub camera_get_matrix_fn: Option<ForeignReadMatrixFn>,
    pub camera_set_matrix_fn: Option<ForeignWriteMatrixFn>,
    pub camera_set_auto_update_fn: Option<ForeignSetFlagFn>,

    // Head-tracking controls
    pub controls_get_standing_matrix_fn: Option<ForeignReadMatrixFn>,
    pub controls_set_update_enabled_fn: Option<ForeignSetFlagFn>,

    // Hand controllers. Availability is read once, at creation.
    pub controller_available: [bool; 2],
    pub controller_set_standing_matrix_fn: Option<ForeignWriteControllerMatrixFn>,

    // Gamepad query
    pub gamepad_get_fn: Option<ForeignGetGamepadFn>,

    // Frame counter
    pub progress_fn: Option<ForeignShowProgressFn>,
}

pub const VRP_GAMEPAD_MAX_AXES: usize = 4;
pub const VRP_GAMEPAD_MAX_BUTTONS: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct VRPlayerGamepadButton {
    pub pressed: bool,
    pub touched: bool,
    pub value: f64,
}

/// A C compatible gamepad. Only the first `axes_len` axes and `buttons_len` buttons are
/// meaningful.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct VRPlayerGamepad {
    pub axes_len: u32,
    pub axes: [f64; VRP_GAMEPAD_MAX_AXES],
    pub buttons_len: u32,
    pub buttons: [VRPlayerGamepadButton; VRP_GAMEPAD_MAX_BUTTONS],
    pub has_position: bool,
    pub position: [f32; 3],
    pub has_orientation: bool,
    pub orientation: [f32; 4],
}

impl VRPlayerGamepad {
    pub fn to_gamepad(&self) -> Gamepad {
        let axes_len = (self.axes_len as usize).min(VRP_GAMEPAD_MAX_AXES);
        let buttons_len = (self.buttons_len as usize).min(VRP_GAMEPAD_MAX_BUTTONS);

        Gamepad {
            id: String::new(),
            axes: self.axes[..axes_len].to_vec(),
            buttons: self.buttons[..buttons_len]
                .iter()
                .map(|b| GamepadButton::new(b.pressed, b.touched, b.value))
                .collect(),
            pose: GamepadPose {
                position: self.has_position.then_some(self.position),
                orientation: self.has_orientation.then_some(self.orientation),
            },
        }
    }

    /// Anything past the fixed capacities is dropped.
    pub fn from_gamepad(gamepad: &Gamepad) -> Self {
        let mut raw = Self::default();

        for (slot, axis) in raw.axes.iter_mut().zip(&gamepad.axes) {
            *slot = *axis;
            raw.axes_len += 1;
        }

        for (slot, button) in raw.buttons.iter_mut().zip(&gamepad.buttons) {
            *slot = VRPlayerGamepadButton {
                pressed: button.pressed,
                touched: button.touched,
                value: button.value,
            };
            raw.buttons_len += 1;
        }

        if let Some(position) = gamepad.pose.position {
            raw.has_position = true;
            raw.position = position;
        }

        if let Some(orientation) = gamepad.pose.orientation {
            raw.has_orientation = true;
            raw.orientation = orientation;
        }

        raw
    }
}

pub struct ForeignCamera {
    context: usize,
    get_matrix: ForeignReadMatrixFn,
    set_matrix: ForeignWriteMatrixFn,
    set_auto_update: ForeignSetFlagFn,
}

impl ForeignCamera {
    pub fn from_hooks(hooks: &VRPlayerHostHooks) -> Option<Self> {
        Some(Self {
            context: hooks.context,
            get_matrix: hooks.camera_get_matrix_fn?,
            set_matrix: hooks.camera_set_matrix_fn?,
            set_auto_update: hooks.camera_set_auto_update_fn?,
        })
    }
}

impl Camera for ForeignCamera {
    fn matrix(&self) -> Matrix4 {
        let mut matrix = IDENTITY_MATRIX;

        // The host only ever writes 16 floats into the buffer we hand it.
        unsafe { (self.get_matrix)(self.context, matrix.as_mut_ptr()) };

        matrix
    }

    fn set_matrix(&mut self, matrix: &Matrix4) {
        unsafe { (self.set_matrix)(self.context, matrix.as_ptr()) };
    }

    fn set_matrix_auto_update(&mut self, enabled: bool) {
        unsafe { (self.set_auto_update)(self.context, enabled) };
    }
}

pub struct ForeignControls {
    context: usize,
    get_standing_matrix: ForeignReadMatrixFn,
    set_update_enabled: ForeignSetFlagFn,
}

impl ForeignControls {
    pub fn from_hooks(hooks: &VRPlayerHostHooks) -> Option<Self> {
        Some(Self {
            context: hooks.context,
            get_standing_matrix: hooks.controls_get_standing_matrix_fn?,
            set_update_enabled: hooks.controls_set_update_enabled_fn?,
        })
    }
}

impl HeadControls for ForeignControls {
    fn standing_matrix(&self) -> Matrix4 {
        let mut matrix = IDENTITY_MATRIX;
        unsafe { (self.get_standing_matrix)(self.context, matrix.as_mut_ptr()) };
        matrix
    }

    fn set_update_enabled(&mut self, enabled: bool) {
        unsafe { (self.set_update_enabled)(self.context, enabled) };
    }
}

pub struct ForeignController {
    context: usize,
    slot: u32,
    set_standing_matrix: Option<ForeignWriteControllerMatrixFn>,
}

impl ForeignController {
    /// Returns `None` when the host reported no controller in `slot`.
    ///
    /// The availability flag alone decides this; without a standing-matrix callback the
    /// controller is still recorded, it just never receives standing writes.
    pub fn from_hooks(hooks: &VRPlayerHostHooks, slot: usize) -> Option<Self> {
        if !hooks.controller_available.get(slot).copied().unwrap_or(false) {
            return None;
        }

        Some(Self {
            context: hooks.context,
            slot: slot as u32,
            set_standing_matrix: hooks.controller_set_standing_matrix_fn,
        })
    }
}

impl TrackedController for ForeignController {
    fn set_standing_matrix(&mut self, matrix: &Matrix4) {
        if let Some(set_standing_matrix) = self.set_standing_matrix {
            unsafe { set_standing_matrix(self.context, self.slot, matrix.as_ptr()) };
        }
    }
}

pub struct ForeignInputSource {
    context: usize,
    get_gamepad: ForeignGetGamepadFn,
}

impl ForeignInputSource {
    pub fn from_hooks(hooks: &VRPlayerHostHooks) -> Option<Self> {
        Some(Self {
            context: hooks.context,
            get_gamepad: hooks.gamepad_get_fn?,
        })
    }
}

impl InputSource for ForeignInputSource {
    fn gamepads(&self) -> GamepadList {
        std::array::from_fn(|slot| {
            let mut raw = VRPlayerGamepad::default();
            let connected = unsafe { (self.get_gamepad)(self.context, slot as u32, &mut raw) };

            connected.then(|| raw.to_gamepad())
        })
    }
}

pub struct ForeignDisplay {
    context: usize,
    show: ForeignShowProgressFn,
}

impl ForeignDisplay {
    pub fn from_hooks(hooks: &VRPlayerHostHooks) -> Option<Self> {
        Some(Self {
            context: hooks.context,
            show: hooks.progress_fn?,
        })
    }
}

impl ProgressDisplay for ForeignDisplay {
    fn show(&mut self, text: &str) {
        match CString::new(text) {
            // The host must copy the string if it wants to keep it; it's freed on return.
            Ok(text) => unsafe { (self.show)(self.context, text.as_ptr()) },

            Err(error) => {
                tracing::error!(target: Log::Host, ?error, "Unable to pass progress text to host");
            },
        }
    }
}
