/// A 4x4 homogeneous transform, stored as 16 values in the host runtime's own element order.
///
/// The player never does math on these; it only copies them around, so the row/column
/// convention is whatever the host uses.
pub type Matrix4 = [f32; 16];

pub const IDENTITY_MATRIX: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// The live head camera.
pub trait Camera: Send {
    /// Returns the current world transform of the camera.
    fn matrix(&self) -> Matrix4;

    /// Overwrites the world transform of the camera.
    fn set_matrix(&mut self, matrix: &Matrix4);

    /// Toggles whether the runtime recomputes the camera transform on its own every frame.
    /// Playback turns this off so written transforms are not clobbered.
    fn set_matrix_auto_update(&mut self, enabled: bool);
}

/// The head-tracking controls object that normally pushes the HMD pose into the camera.
pub trait HeadControls: Send {
    /// The standing transform mapping tracked space onto the play-space floor.
    fn standing_matrix(&self) -> Matrix4;

    /// Enables or disables the per-frame `update()` hook of the controls.
    fn set_update_enabled(&mut self, enabled: bool);
}

/// A tracked hand controller object in the scene.
pub trait TrackedController: Send {
    fn set_standing_matrix(&mut self, matrix: &Matrix4);
}

/// Whatever surface shows the `"<cursor>/<frameCount>"` counter to the user.
pub trait ProgressDisplay: Send {
    fn show(&mut self, text: &str);
}
